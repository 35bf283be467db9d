use clap::{Arg, ArgAction, arg, command};
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Flags shared by `scrape` and `plan`: they decide which listings get visited.
fn plan_args() -> Vec<Arg> {
    vec![
        arg!(--"variant" <VARIANT>)
            .required(false)
            .help("Scrape preset to start from")
            .value_parser(["catalog", "sweep", "persistent"])
            .default_value("persistent"),
        arg!(-b --"brand" <NAME>)
            .required(false)
            .help("Only crawl listings for this manufacturer (repeatable; sweep variants only)")
            .action(ArgAction::Append),
        arg!(--"from-year" <YEAR>)
            .required(false)
            .help("First release year to crawl (sweep variants only)")
            .value_parser(clap::value_parser!(u16)),
        arg!(--"to-year" <YEAR>)
            .required(false)
            .help("Last release year to crawl, inclusive (sweep variants only)")
            .value_parser(clap::value_parser!(u16)),
        arg!(--"igp" <IGP>)
            .required(false)
            .help("Integrated graphics filter (sweep variants only)")
            .value_parser(["yes", "no", "both"]),
        arg!(--"base-url" <URL>)
            .required(false)
            .help("Site root to scrape instead of the built-in one")
            .value_parser(clap::value_parser!(Url)),
    ]
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("gpuscrape")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("gpuscrape")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v debug, -vv trace)")
                .required(false)
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scrape")
                .about("Crawl the listing pages and append every GPU found to a CSV file")
                .args(plan_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("CSV file to write (default depends on the variant)"),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"max-retries" <N>)
                        .required(false)
                        .help("Give up on a URL after N backoff retries (persistent variant only)")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            command!("plan")
                .about("Print the first listing page of every segment a scrape would visit")
                .args(plan_args()),
        )
        .subcommand(
            command!("parse")
                .about("Extract a CSV row from a saved GPU detail page")
                .arg(
                    arg!(<FILE>)
                        .required(true)
                        .help("Path to the saved HTML page")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
