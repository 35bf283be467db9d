#[path = "commands.rs"]
pub mod commands;

// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use commands::{CLAP_STYLING, command_argument_builder};
pub use handlers::{
    build_config_from_args, describe_plan, expand_output_path, parse_detail_file,
    parse_igp_option, record_to_csv,
};

// Re-export scrape functionality from gpuscrape-core
pub use gpuscrape_core::{ScrapeOutcome, execute_scrape, generate_scrape_report, plan_urls};
