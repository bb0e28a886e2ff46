use super::open_store;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use wastewise_core::types::User;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Register a household and print its API token
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// People living in the household
        #[arg(long, default_value = "1")]
        household_size: u32,
    },
    /// List registered households
    List,
    /// Issue an additional API token for an existing user
    Token {
        #[arg(long)]
        email: String,
    },
}

pub fn run(root: &Path, subcmd: UserSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UserSubcommand::Add {
            email,
            name,
            household_size,
        } => add(root, &email, &name, household_size, json),
        UserSubcommand::List => list(root, json),
        UserSubcommand::Token { email } => token(root, &email, json),
    }
}

fn add(root: &Path, email: &str, name: &str, household_size: u32, json: bool) -> anyhow::Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        anyhow::bail!("invalid email '{email}'");
    }
    let (_, store) = open_store(root)?;
    let user = User::new(email, name.trim(), household_size);
    let token = store.create_user(&user)?;

    if json {
        return print_json(&serde_json::json!({ "user": user, "token": token }));
    }
    println!("Added user {} ({})", user.email, user.id);
    println!("token: {token}");
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = open_store(root)?;
    let users = store.list_users()?;

    if json {
        return print_json(&users);
    }
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }
    let rows = users
        .iter()
        .map(|u| {
            vec![
                u.email.clone(),
                u.name.clone(),
                u.household_size.to_string(),
                u.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["EMAIL", "NAME", "HOUSEHOLD", "JOINED"], rows);
    Ok(())
}

fn token(root: &Path, email: &str, json: bool) -> anyhow::Result<()> {
    let (_, store) = open_store(root)?;
    let user = store.user_by_email(email)?;
    let token = store.issue_token(user.id)?;
    if json {
        return print_json(&serde_json::json!({ "email": user.email, "token": token }));
    }
    println!("{token}");
    Ok(())
}
