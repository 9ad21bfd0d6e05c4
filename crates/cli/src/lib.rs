mod classpath;
mod fetch;
mod serve;

use clap::{Args, Parser, Subcommand};
use jbridge_core::protocol::Framing;
use jbridge_runtime::ClasspathConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jbridge",
    version,
    about = "Serves compiled Java classes to a bridge peer over stdin/stdout",
    long_about = "jbridge resolves class files from a boot and an application classpath \
                  (directories, jar archives and JDK runtime images) and answers class and \
                  package requests on stdin/stdout."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Classpath selection shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ClasspathArgs {
    /// Boot search path (default: $JBRIDGE_BOOT_CLASSPATH, then the discovered JDK)
    #[arg(long, value_name = "PATH")]
    pub boot_classpath: Option<String>,

    /// Application search path (default: $CLASSPATH)
    #[arg(long, value_name = "PATH")]
    pub classpath: Option<String>,
}

impl ClasspathArgs {
    pub fn into_config(self) -> ClasspathConfig {
        ClasspathConfig::from_env()
            .with_boot(self.boot_classpath)
            .with_application(self.classpath)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the class-fetch protocol on stdin/stdout
    #[command(
        long_about = "Reads one request per line from stdin and writes framed replies to stdout \
                            until `Q` or end of input. Logs go to ~/.jbridge/logs, never to stdout."
    )]
    Serve {
        #[command(flatten)]
        classpath: ClasspathArgs,

        /// Payload framing: `raw` or `length-prefixed`
        #[arg(long, value_name = "MODE", default_value_t = Framing::Raw)]
        framing: Framing,

        /// Fail on unknown commands instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Mirror logs to stderr
        #[arg(long)]
        log_stderr: bool,
    },
    /// Look up one class and write its bytes
    Fetch {
        /// Class name in internal form, e.g. java/lang/String
        #[arg(value_name = "CLASS")]
        class_name: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        classpath: ClasspathArgs,
    },
    /// Print the resolved classpath, highest priority last
    Classpath {
        #[command(flatten)]
        classpath: ClasspathArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on command
    let _guard = match &cli.command {
        Commands::Serve { log_stderr, .. } => jbridge_runtime::init_logging("serve", *log_stderr),
        _ => jbridge_runtime::init_logging("cli", true),
    };

    match cli.command {
        Commands::Serve {
            classpath,
            framing,
            strict,
            ..
        } => serve::run(classpath.into_config(), framing, strict),
        Commands::Fetch {
            class_name,
            output,
            classpath,
        } => fetch::run(classpath.into_config(), &class_name, output),
        Commands::Classpath {
            classpath: args,
            json,
        } => classpath::run(args.into_config(), json),
    }
}
