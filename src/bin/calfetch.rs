extern crate calfetch as lib;

use flexi_logger::{FileSpec, Logger};
use lib::app::{App, GenerateRequest};
use lib::args::{Args, Command};
use std::io::stdout;
use structopt::StructOpt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        println!("calfetch ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let app = App::from_config(config);
    log::debug!("Using holiday API at {}", app.config().api_url);

    let stdout = stdout();
    let mut out = stdout.lock();

    match args.cmd {
        Command::Countries => app.countries(&mut out)?,
        Command::Fetch {
            year,
            country,
            csv,
            json,
        } => app.fetch(
            &mut out,
            &year,
            country.as_deref(),
            csv.as_deref(),
            json.as_deref(),
        )?,
        Command::Generate {
            year,
            country,
            holidays,
            style,
            monday,
            output,
            commands,
        } => app.generate(
            &mut out,
            &GenerateRequest {
                year: &year,
                country: country.as_deref(),
                holidays: holidays.as_deref(),
                style,
                monday,
                output: output.as_deref(),
                commands: commands.as_deref(),
            },
        )?,
    }

    Ok(())
}
