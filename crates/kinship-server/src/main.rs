//! Kinship command-line client.
//!
//! Each invocation opens the snapshot database, runs one command, prints the
//! result on stdout and saves the directory back.
//!
//! # Usage
//!
//! ```bash
//! kinship create-account alice p1 "Alice Liddell"
//! kinship create-account bob p2 Bob
//! kinship add-friend alice bob
//! kinship add-friend bob alice
//! kinship friends alice          # {bob}
//! kinship --data /tmp/k.redb reset
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use kinship_core::FriendRequestOutcome;
use kinship_server::{RedbStorage, Service};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Kinship social directory
#[derive(Parser, Debug)]
#[command(name = "kinship")]
#[command(about = "Accounts, friendships and inboxes backed by a snapshot database")]
#[command(version)]
struct Args {
    /// Path to the snapshot database
    #[arg(short, long, default_value = "kinship.redb")]
    data: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new account
    CreateAccount {
        /// Login id
        login: String,
        /// Password
        password: String,
        /// Display name
        name: String,
    },
    /// Open a session; prints the login id
    Login {
        /// Login id
        login: String,
        /// Password
        password: String,
    },
    /// Print a profile attribute
    GetAttribute {
        /// Login id
        login: String,
        /// Attribute name (`name` and `login` are built in)
        attribute: String,
    },
    /// Write a profile attribute
    SetAttribute {
        /// Login id
        login: String,
        /// Attribute name
        attribute: String,
        /// New value
        value: String,
    },
    /// Invite a friend, or accept their pending invite
    AddFriend {
        /// Login id of the requester
        login: String,
        /// Login id of the other account
        friend: String,
    },
    /// Print whether two accounts are friends
    IsFriend {
        /// Login id
        login: String,
        /// Login id of the other account
        friend: String,
    },
    /// Print an account's friends as `{a,b}`
    Friends {
        /// Login id
        login: String,
    },
    /// Deliver a message
    SendMessage {
        /// Sender login id
        from: String,
        /// Recipient login id
        to: String,
        /// Message body
        body: String,
    },
    /// Pop and print the oldest unread message
    ReadMessage {
        /// Login id
        login: String,
    },
    /// Delete every account and session
    Reset,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let store = RedbStorage::open(&args.data)?;
    let mut service = Service::open(store)?;

    let output = run(&mut service, args.command)?;
    service.shutdown()?;

    if let Some(line) = output {
        writeln!(io::stdout().lock(), "{line}")?;
    }
    Ok(())
}

/// Execute one command. Returns the line to print, if any.
fn run(
    service: &mut Service<RedbStorage>,
    command: Command,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let output = match command {
        Command::CreateAccount { login, password, name } => {
            service.create_account(Some(&login), Some(&password), &name)?;
            None
        },
        Command::Login { login, password } => Some(service.login(&login, &password)?),
        Command::GetAttribute { login, attribute } => {
            Some(service.get_attribute(&login, &attribute)?)
        },
        Command::SetAttribute { login, attribute, value } => {
            service.set_attribute(&login, &attribute, &value)?;
            None
        },
        Command::AddFriend { login, friend } => match service.add_friend(&login, &friend)? {
            FriendRequestOutcome::Invited => Some("invited".to_owned()),
            FriendRequestOutcome::Accepted => Some("accepted".to_owned()),
        },
        Command::IsFriend { login, friend } => {
            Some(service.is_friend(&login, &friend)?.to_string())
        },
        Command::Friends { login } => Some(service.friends(&login)?),
        Command::SendMessage { from, to, body } => {
            service.send_message(&from, &to, &body)?;
            None
        },
        Command::ReadMessage { login } => Some(service.read_message(&login)?),
        Command::Reset => {
            service.reset();
            None
        },
    };
    Ok(output)
}
