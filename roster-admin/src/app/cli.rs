//! Command line front end
//!
//! Every invocation logs in, dispatches the messages for one command and
//! prints the resulting view.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Password};
use roster_model::prelude::{Role, UserId, UserRecord};
use std::sync::Arc;

use crate::app::bootstrap::{AppConfig, build_orchestrator};
use crate::common::messages::DomainMessage;
use crate::domains::auth::messages::Message as AuthMessage;
use crate::domains::auth::security::SecureCredential;
use crate::domains::ui::feedback::FeedbackState;
use crate::domains::user_management::form::FormField;
use crate::domains::user_management::messages::Message as UserMessage;
use crate::infra::config::Config;
use crate::orchestrator::Orchestrator;
use crate::state::StateView;

#[derive(Parser, Debug)]
#[command(name = "roster-admin", version, about = "Administer a Roster user directory")]
pub struct Cli {
    /// Directory server base URL
    #[arg(long, global = true, env = "ROSTER_SERVER_URL")]
    pub server_url: Option<String>,

    /// Login email
    #[arg(long, global = true, env = "ROSTER_EMAIL")]
    pub email: Option<String>,

    /// Login password; prompted for when absent
    #[arg(long, global = true, env = "ROSTER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Keep the session token in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Use the built-in demo directory instead of a server
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and show who you are
    Login,
    /// List the directory
    List,
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long = "user-email")]
        user_email: String,
        #[arg(long)]
        phone: Option<String>,
        /// Password for the new user; prompted for when absent
        #[arg(long = "user-password")]
        user_password: Option<String>,
    },
    /// Edit a user's details; unspecified fields keep their current value
    Edit {
        id: UserId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long = "user-email")]
        user_email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Change a user's role
    Role { id: UserId, role: Role },
    /// Delete a user
    Delete {
        id: UserId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Set a user's salary
    Salary { id: UserId, amount: String },
    /// End the session and erase the stored token
    Logout,
}

fn app_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::new(Config::load())
        .with_ephemeral(cli.ephemeral)
        .with_test_stubs(cli.demo);
    if let Some(server_url) = &cli.server_url {
        config = config.with_server_url(server_url.clone());
    }
    config
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = app_config(&cli);
    let orchestrator = build_orchestrator(&config)?;

    if matches!(cli.command, Command::Logout) {
        orchestrator.handle(AuthMessage::Logout.into()).await;
        println!("Logged out.");
        return Ok(());
    }

    login(&orchestrator, &cli).await?;

    match cli.command {
        Command::Login => {
            let view = orchestrator.snapshot();
            if let Some(identity) = &view.identity {
                println!("Logged in as {} <{}>", identity.display_name, identity.email);
            }
        }
        Command::List => print_users(&orchestrator.snapshot().users),
        Command::Create {
            name,
            surname,
            user_email,
            phone,
            user_password,
        } => {
            let password = match user_password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("New user's password")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()
                    .context("Failed to read password")?,
            };
            let mut messages = vec![
                UserMessage::CreateUser,
                UserMessage::UpdateFormField(FormField::Name, name),
                UserMessage::UpdateFormField(FormField::Surname, surname),
                UserMessage::UpdateFormField(FormField::Email, user_email),
                UserMessage::UpdateFormField(FormField::Password, password),
            ];
            if let Some(phone) = phone {
                messages.push(UserMessage::UpdateFormField(FormField::Phone, phone));
            }
            messages.push(UserMessage::SubmitForm);
            dispatch_all(&orchestrator, messages).await;
            finish(&orchestrator.snapshot())?;
        }
        Command::Edit {
            id,
            name,
            surname,
            user_email,
            phone,
            role,
        } => {
            let mut messages = vec![UserMessage::EditUser(id)];
            let fields = [
                (FormField::Name, name),
                (FormField::Surname, surname),
                (FormField::Email, user_email),
                (FormField::Phone, phone),
            ];
            messages.extend(fields.into_iter().filter_map(|(field, value)| {
                value.map(|value| UserMessage::UpdateFormField(field, value))
            }));
            if let Some(role) = role {
                messages.push(UserMessage::UpdateFormRole(role));
            }
            messages.push(UserMessage::SubmitForm);
            require_record(&orchestrator, id)?;
            dispatch_all(&orchestrator, messages).await;
            finish(&orchestrator.snapshot())?;
        }
        Command::Role { id, role } => {
            require_record(&orchestrator, id)?;
            dispatch_all(
                &orchestrator,
                vec![
                    UserMessage::EditUserRole(id),
                    UserMessage::UpdateFormRole(role),
                    UserMessage::SubmitForm,
                ],
            )
            .await;
            finish(&orchestrator.snapshot())?;
        }
        Command::Delete { id, yes } => {
            let name = require_record(&orchestrator, id)?.full_name();
            orchestrator.handle(UserMessage::DeleteUser(id).into()).await;
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!("Delete {} (#{})?", name, id))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
            if confirmed {
                orchestrator.handle(UserMessage::DeleteUserConfirm.into()).await;
                finish(&orchestrator.snapshot())?;
            } else {
                orchestrator.handle(UserMessage::DeleteUserCancel.into()).await;
                println!("Cancelled.");
            }
        }
        Command::Salary { id, amount } => {
            require_record(&orchestrator, id)?;
            orchestrator
                .handle(UserMessage::SetSalary(id, amount).into())
                .await;
            finish(&orchestrator.snapshot())?;
        }
        Command::Logout => {}
    }

    Ok(())
}

async fn login(orchestrator: &Arc<Orchestrator>, cli: &Cli) -> Result<()> {
    let email = match &cli.email {
        Some(email) => email.clone(),
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read email")?,
    };
    let password = match &cli.password {
        Some(password) => SecureCredential::from(password.as_str()),
        None => SecureCredential::new(
            Password::new()
                .with_prompt("Password")
                .interact()
                .context("Failed to read password")?,
        ),
    };

    orchestrator
        .handle(DomainMessage::Auth(AuthMessage::Login { email, password }))
        .await;

    let view = orchestrator.snapshot();
    if !view.is_authenticated() {
        bail!(
            "{}",
            view.feedback.message().unwrap_or("Login failed. Please try again.")
        );
    }
    Ok(())
}

async fn dispatch_all(orchestrator: &Orchestrator, messages: Vec<UserMessage>) {
    for message in messages {
        orchestrator.handle(message.into()).await;
    }
}

fn require_record(orchestrator: &Orchestrator, id: UserId) -> Result<UserRecord> {
    match orchestrator.snapshot().users.into_iter().find(|user| user.id == id) {
        Some(record) => Ok(record),
        None => bail!("No user with id {}", id),
    }
}

/// Print feedback; an error message becomes the command's error
fn finish(view: &StateView) -> Result<()> {
    match &view.feedback {
        FeedbackState::Error(message) => bail!("{}", message),
        FeedbackState::Success(message) => {
            println!("{}", message);
            print_users(&view.users);
            Ok(())
        }
        FeedbackState::None => Ok(()),
    }
}

fn print_users(users: &[UserRecord]) {
    if users.is_empty() {
        println!("(no users)");
        return;
    }
    println!(
        "{:>5}  {:<24} {:<32} {:<16} {:<6} {:>10}",
        "ID", "NAME", "EMAIL", "PHONE", "ROLE", "SALARY"
    );
    for user in users {
        println!(
            "{:>5}  {:<24} {:<32} {:<16} {:<6} {:>10}",
            user.id,
            user.full_name(),
            user.email,
            user.phone.as_deref().unwrap_or("-"),
            user.role.map_or("-", |role| role.as_str()),
            user.salary
                .map(|salary| format!("{:.2}", salary))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}
