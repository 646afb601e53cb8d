use std::path::PathBuf;
use structopt::StructOpt;

use crate::settings::RenderStyle;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "calfetch",
    about = "Fetch public holidays and render them into a twelve month calendar."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "list countries with holiday data")]
    Countries,

    #[structopt(about = "fetch and list the public holidays of a year")]
    Fetch {
        #[structopt(short = "y", long = "year")]
        year: String,

        #[structopt(
            short = "C",
            long = "country",
            help = "two letter country code, defaults to the configured one"
        )]
        country: Option<String>,

        #[structopt(long = "csv", help = "export holidays as CSV", parse(from_os_str))]
        csv: Option<PathBuf>,

        #[structopt(long = "json", help = "export holidays as JSON", parse(from_os_str))]
        json: Option<PathBuf>,
    },

    #[structopt(about = "render a calendar of the whole year as SVG")]
    Generate {
        #[structopt(short = "y", long = "year")]
        year: String,

        #[structopt(
            short = "C",
            long = "country",
            help = "fetch holidays of this country before rendering, without it no holidays are fetched"
        )]
        country: Option<String>,

        #[structopt(
            long = "holidays",
            help = "read holidays from a JSON file instead of fetching",
            parse(from_os_str)
        )]
        holidays: Option<PathBuf>,

        #[structopt(long = "style", help = "grid or nogrid")]
        style: Option<RenderStyle>,

        #[structopt(long = "monday", help = "start weeks on monday")]
        monday: bool,

        #[structopt(
            short = "o",
            long = "output",
            help = "SVG file to write, defaults to calendar-<year>.svg",
            parse(from_os_str)
        )]
        output: Option<PathBuf>,

        #[structopt(
            long = "commands",
            help = "also write the draw commands as JSON",
            parse(from_os_str)
        )]
        commands: Option<PathBuf>,
    },
}
