use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ipd_lib::config;
use ipd_lib::migration::{http, MigrationRunner};

#[derive(Debug, Parser)]
#[command(
    name = "ipd-migrate",
    version,
    about = "Apply the duty roster schema to the hospital database",
    long_about = "Executes the duty roster schema script verbatim against the hospital\n\
        database. A schema that already exists is reported and treated as success.\n\n\
        EXAMPLES:\n\
        \n  ipd-migrate                                   Use the default database and schema\n\
        \n  ipd-migrate --database /srv/hms/hospital.db   Target another database\n\
        \n  ipd-migrate --serve 127.0.0.1:8085            Expose POST /migrations/duty-roster"
)]
struct Cli {
    /// SQLite database to migrate [default: ~/IpdConsole/hospital.db]
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Schema script to execute
    #[arg(long, value_name = "PATH", default_value = config::DUTY_ROSTER_SCHEMA)]
    schema: PathBuf,

    /// Serve the HTTP trigger on this address instead of running once
    #[arg(long, value_name = "ADDR")]
    serve: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> ExitCode {
    ipd_lib::init_tracing();
    let cli = Cli::parse();

    let runner = MigrationRunner::new(
        cli.database.unwrap_or_else(config::hospital_db_path),
        cli.schema,
    );

    if let Some(addr) = cli.serve {
        return match http::serve(addr, runner).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Cannot serve on {addr}: {e}");
                ExitCode::FAILURE
            }
        };
    }

    match tokio::task::spawn_blocking(move || runner.run()).await {
        Ok(Ok(outcome)) => {
            println!("{}", outcome.message());
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Migration task failed: {e}");
            ExitCode::FAILURE
        }
    }
}
