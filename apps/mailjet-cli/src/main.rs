//! Mailjet CLI
//!
//! Thin command line front-end over the `mailjet` library. Every command prints the
//! unified response as JSON.

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::Environment;
use eyre::{Result, WrapErr};
use mailjet::{
    Address, Attachment, CampaignAggregate, GenericMessage, MailjetClient, NativeMessage,
    Recipient, Response,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

mod cli;

use cli::{Cli, Commands, SendArgs};

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let cli = Cli::parse();
    let client = MailjetClient::from_env().wrap_err("Failed to configure Mailjet client")?;

    match cli.command {
        Commands::Send(args) => {
            let response = send(&client, args).await?;
            info!(count = response.count, "Message sent");
            print(&response)?;
        }

        Commands::SendTemplate {
            template_id,
            from,
            to,
            subject,
            vars,
        } => {
            let variables: BTreeMap<String, Value> = vars
                .into_iter()
                .map(|(key, raw)| {
                    let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                    (key, value)
                })
                .collect();

            let response = client
                .send_template(template_id, Address::new(to), Address::new(from), subject, variables)
                .await?;
            print(&response)?;
        }

        Commands::Campaign { name } => print(&client.get_campaign(&name).await?)?,

        Commands::Stats {
            campaign_id,
            from,
            to,
            scale,
        } => {
            let response = client
                .get_graph_statistics(campaign_id, from, to, scale)
                .await?;
            if response.is_empty() {
                info!(campaign_id, "No activity in the requested window");
            }
            print(&response)?;
        }

        Commands::CreateAggregate { campaign_ids, name } => {
            let aggregate = CampaignAggregate::new(campaign_ids, name);
            print(&client.create_campaign_aggregate(&aggregate).await?)?;
        }

        Commands::AggregateStats {
            aggregate_id,
            period,
        } => print(
            &client
                .get_aggregate_graph_statistics(aggregate_id, period)
                .await?,
        )?,
    }

    Ok(())
}

async fn send(client: &MailjetClient, args: SendArgs) -> Result<Response<mailjet::SendAck>> {
    let attachments = args
        .attachments
        .iter()
        .map(|(path, content_type)| Attachment::from_path(path, content_type.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let response = match args.campaign {
        Some(campaign) => {
            let mut message = NativeMessage::new(args.from, args.subject)
                .with_campaign(campaign)
                .with_html(args.html.unwrap_or_default());
            message.from_name = args.from_name;
            message.text_part = args.text;
            message.recipients = args.to.into_iter().map(Recipient::new).collect();
            message.attachments = attachments;
            client.send_native(&message).await?
        }
        None => {
            let mut from = Address::new(args.from);
            from.name = args.from_name;

            let mut message = GenericMessage::new(from, args.subject);
            message.to = args.to.into_iter().map(Address::new).collect();
            message.attachments = attachments;
            message = match (args.html, args.text) {
                (Some(html), _) => message.with_html(html),
                (None, text) => message.with_text(text.unwrap_or_default()),
            };
            client.send_generic(&message).await?
        }
    };

    Ok(response)
}

fn print<T: Serialize>(response: &Response<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
