use std::fs;
use std::process;

use log::{error, info};
use talk_core::{Capabilities, Conversation, SignalingMessage};

const USAGE: &str = "usage:
  talk-probe capabilities <file>
  talk-probe signaling <file>
  talk-probe conversation <conversation-file> [<capabilities-file>]";

fn read(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            error!("Failed to read {}: {}", path, e);
            None
        }
    }
}

/// Accepts either a bare capability object or a full OCS response.
fn load_capabilities(raw: &str) -> Capabilities {
    if raw.contains("\"ocs\"") {
        Capabilities::from_ocs_response(raw)
    } else {
        Capabilities::parse(raw)
    }
}

fn print_capabilities(caps: &Capabilities) {
    println!("server name:            {}", caps.server_name());
    println!("features:               {}", caps.spreed_features().collect::<Vec<_>>().join(", "));
    println!("message max length:     {}", caps.message_max_length());
    println!("description max length: {}", caps.conversation_description_length());
    println!("read status private:    {}", caps.is_read_status_private());
    println!("can edit scopes:        {}", caps.can_edit_scopes());
    println!("attachment folder:      {}", caps.attachment_folder());
    println!("avatar endpoint:        {}", caps.is_avatar_endpoint_available());
    println!("user status:            {}", caps.is_user_status_available());
    println!("calls enabled:          {}", caps.is_able_to_call());
    println!("server EOL:             {}", caps.is_server_eol());
}

fn probe_signaling(raw: &str) -> talk_core::Result<()> {
    let message = SignalingMessage::from_json(raw)?;
    info!("Decoded {} message", message.kind());
    println!("{}", message.to_json()?);
    Ok(())
}

fn probe_conversation(raw: &str, caps: &Capabilities) -> talk_core::Result<()> {
    let conversation: Conversation = if raw.contains("\"ocs\"") {
        Conversation::from_ocs(raw)?
    } else {
        serde_json::from_str(raw)?
    };
    println!("token:             {}", conversation.token);
    println!("public:            {}", conversation.is_public());
    println!("guest:             {}", conversation.is_guest());
    println!("can moderate:      {}", conversation.can_moderate(caps));
    println!("can leave:         {}", conversation.can_leave(caps));
    println!("can delete:        {}", conversation.can_delete(caps));
    println!("name editable:     {}", conversation.is_name_editable(caps));
    println!("lobby applicable:  {}", conversation.is_lobby_view_applicable(caps));
    println!("read only:         {}", conversation.is_read_only());
    Ok(())
}

fn run(args: &[String]) -> Result<(), String> {
    let command = args.first().map(String::as_str);
    let path = args.get(1).ok_or_else(|| USAGE.to_string())?;
    let raw = read(path).ok_or_else(|| format!("cannot read {path}"))?;

    match command {
        Some("capabilities") => {
            print_capabilities(&load_capabilities(&raw));
            Ok(())
        }
        Some("signaling") => probe_signaling(&raw).map_err(|e| e.to_string()),
        Some("conversation") => {
            let caps = match args.get(2) {
                Some(caps_path) => {
                    let caps_raw = read(caps_path).ok_or_else(|| format!("cannot read {caps_path}"))?;
                    load_capabilities(&caps_raw)
                }
                None => Capabilities::empty(),
            };
            probe_conversation(&raw, &caps).map_err(|e| e.to_string())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("{e}");
        process::exit(1);
    }
}
