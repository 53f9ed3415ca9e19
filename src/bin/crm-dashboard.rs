use chrono::Utc;
use clap::{Arg, ArgMatches, Command};
use log::{debug, error};
use std::process;

use crm_dashboard::collection::CustomerCollection;
use crm_dashboard::config::ClientOptions;
use crm_dashboard::customers::{CustomerApi, CustomerUpdate, ListQuery, SortKey};
use crm_dashboard::dashboard::{rows, CustomerRow, EditField, GENDER_OPTIONS, PAGE_SIZE_OPTIONS};
use crm_dashboard::error::Error;
use crm_dashboard::Crm;

fn cli() -> Command<'static> {
    Command::new("crm-dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse and edit customers of the CRM API")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("API base URL (defaults to CRM_API_URL or the public API)")
                .takes_value(true)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("Show statistics and one page of customers")
                .arg(Arg::new("page").long("page").short('p').takes_value(true))
                .arg(
                    Arg::new("per-page")
                        .long("per-page")
                        .short('n')
                        .help("5, 10, 25, 50 or 100")
                        .takes_value(true),
                )
                .arg(Arg::new("search").long("search").short('s').takes_value(true))
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .value_name("COLUMN")
                        .help("fullName, email, age, city, country, registeredDate or a dot-path")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a customer")
                .arg(Arg::new("uuid").required(true)),
        )
        .subcommand(
            Command::new("update")
                .about("Change selected fields of a customer")
                .arg(Arg::new("uuid").required(true))
                .args(update_args()),
        )
}

const UPDATE_FLAGS: [(&str, EditField); 8] = [
    ("email", EditField::Email),
    ("phone", EditField::Phone),
    ("cell", EditField::Cell),
    ("gender", EditField::Gender),
    ("first", EditField::FirstName),
    ("last", EditField::LastName),
    ("city", EditField::City),
    ("country", EditField::Country),
];

fn update_args() -> Vec<Arg<'static>> {
    UPDATE_FLAGS
        .iter()
        .map(|(flag, field)| {
            let arg = Arg::new(*flag)
                .long(*flag)
                .help(field.label())
                .takes_value(true);
            match field {
                EditField::Gender => arg.possible_values(GENDER_OPTIONS.map(|(value, _)| value)),
                _ => arg,
            }
        })
        .collect()
}

fn parse_number(matches: &ArgMatches, name: &str) -> Result<Option<u32>, Error> {
    matches
        .value_of(name)
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                Error::invalid_input(format!("--{} expects a number, got {}", name, v))
            })
        })
        .transpose()
}

fn print_rows(rows: &[CustomerRow]) {
    println!(
        "{:<24} {:<32} {:<16} {:>4} {:<16} {:<24} {:<8} {}",
        "Name", "Email", "Phone", "Age", "City", "Country", "Gender", "Registered"
    );
    for row in rows {
        println!(
            "{:<24} {:<32} {:<16} {:>4} {:<16} {:<24} {:<8} {}",
            row.full_name,
            row.email,
            row.phone,
            row.age,
            row.city,
            row.country,
            row.gender,
            row.registered
        );
    }
}

fn list_query(matches: &ArgMatches, default_per_page: u32) -> Result<ListQuery, Error> {
    let mut query = ListQuery::new().per_page(default_per_page);
    if let Some(page) = parse_number(matches, "page")? {
        query = query.page(page);
    }
    if let Some(per_page) = parse_number(matches, "per-page")? {
        if !PAGE_SIZE_OPTIONS.contains(&per_page) {
            return Err(Error::invalid_input(format!(
                "--per-page must be one of {:?}",
                PAGE_SIZE_OPTIONS
            )));
        }
        query = query.per_page(per_page);
    }
    if let Some(search) = matches.value_of("search") {
        query = query.search(search);
    }
    if let Some(sort) = matches.value_of("sort") {
        let key = if sort.contains('.') {
            SortKey::from_path(sort)
        } else {
            SortKey::from_column(sort)
        };
        query = query.sort_by(key);
    }
    query.validate()?;
    Ok(query)
}

async fn list(crm: &Crm, matches: &ArgMatches) -> Result<(), Error> {
    let query = list_query(matches, crm.options.per_page)?;
    let collection = CustomerCollection::with_view(crm.customers()?, query);
    collection.load().await?;
    let snapshot = collection.snapshot().await;

    for card in snapshot.stats(Utc::now()).cards() {
        println!("{:<18} {:>12}  ({})", card.title, card.value, card.interval);
    }
    println!();

    print_rows(&rows(&snapshot.customers));

    println!();
    println!(
        "Page {} of {} ({} customers)",
        snapshot.view.page,
        snapshot.page_count().max(1),
        snapshot.total
    );
    Ok(())
}

async fn update(crm: &Crm, matches: &ArgMatches) -> Result<(), Error> {
    let uuid = matches
        .value_of("uuid")
        .ok_or_else(|| Error::invalid_input("uuid is required"))?;

    let mut update = CustomerUpdate::new();
    for (flag, field) in UPDATE_FLAGS {
        if let Some(value) = matches.value_of(flag) {
            field.apply(&mut update, value)?;
        }
    }
    if update.is_empty() {
        return Err(Error::invalid_input("nothing to update"));
    }

    debug!("Update payload: {}", serde_json::to_string(&update)?);
    crm.customers()?.update(uuid, &update).await?;
    println!("Updated {}", uuid);
    Ok(())
}

async fn delete(crm: &Crm, matches: &ArgMatches) -> Result<(), Error> {
    let uuid = matches
        .value_of("uuid")
        .ok_or_else(|| Error::invalid_input("uuid is required"))?;
    crm.customers()?.delete(uuid).await?;
    println!("Deleted {}", uuid);
    Ok(())
}

async fn run(matches: ArgMatches) -> Result<(), Error> {
    let mut options = ClientOptions::from_env()?;
    let base_url = matches
        .value_of("base-url")
        .or_else(|| matches.subcommand().and_then(|(_, sub)| sub.value_of("base-url")));
    if let Some(url) = base_url {
        options = options.with_base_url(url);
    }
    let crm = Crm::new_with_options(options)?;

    match matches.subcommand() {
        Some(("list", sub)) => list(&crm, sub).await,
        Some(("update", sub)) => update(&crm, sub).await,
        Some(("delete", sub)) => delete(&crm, sub).await,
        _ => Err(Error::invalid_input("unknown command")),
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let matches = cli().get_matches();
    if let Err(e) = run(matches).await {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["crm-dashboard", "list"];
        argv.extend_from_slice(args);
        let matches = cli().try_get_matches_from(argv).unwrap();
        matches.subcommand_matches("list").unwrap().clone()
    }

    #[test]
    fn list_builds_view_from_flags() {
        let query = list_query(
            &list_matches(&["-p", "3", "-n", "25", "-s", "mar", "--sort", "country"]),
            10,
        )
        .unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.per_page, 25);
        assert_eq!(query.search, "mar");
        assert_eq!(query.sort_by, SortKey::Country);

        let query = list_query(&list_matches(&["--sort", "dob.age"]), 10).unwrap();
        assert_eq!(query.sort_by, SortKey::Age);
        assert_eq!(query.per_page, 10);
    }

    #[test]
    fn list_rejects_unlisted_page_size() {
        let err = list_query(&list_matches(&["--per-page", "7"]), 10).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn update_gender_is_limited_to_form_choices() {
        assert!(cli()
            .try_get_matches_from(["crm-dashboard", "update", "abc", "--gender", "other"])
            .is_ok());
        assert!(cli()
            .try_get_matches_from(["crm-dashboard", "update", "abc", "--gender", "robot"])
            .is_err());
    }
}
