//! Line commands for the terminal front end.
//!
//! Lines starting with `/` are staff commands; anything else is a customer
//! chat message.

use crate::model::{OrderId, RequestedItem};
use crate::order_actor::OrderFilter;

pub const HELP: &str = "\
Commands:
  /menu                                  show the menu
  /pending | /processed | /orders        list orders
  /approve <order-id> <tracking>         approve a pending order
  /reject <order-id>                     reject a pending order
  /manual <tracking> <item>x<qty> ...    record an approved order directly
  /help                                  show this help
  /quit                                  exit
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat(String),
    Menu,
    List(OrderFilter),
    Approve { id: OrderId, tracking_number: String },
    Reject { id: OrderId },
    Manual {
        tracking_number: String,
        items: Vec<RequestedItem>,
    },
    Help,
    Quit,
}

/// Parses one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Chat(line.to_string())));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("menu", []) => Command::Menu,
        ("pending", []) => Command::List(OrderFilter::Pending),
        ("processed", []) => Command::List(OrderFilter::Processed),
        ("orders", []) => Command::List(OrderFilter::All),
        ("approve", [id, tracking]) => Command::Approve {
            id: OrderId::new(*id),
            tracking_number: tracking.to_string(),
        },
        ("reject", [id]) => Command::Reject {
            id: OrderId::new(*id),
        },
        ("manual", [tracking, items @ ..]) if !items.is_empty() => Command::Manual {
            tracking_number: tracking.to_string(),
            items: items.iter().map(|item| parse_item(item)).collect(),
        },
        ("help", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => return Err(format!("Unrecognized command '{}'. Type /help.", line)),
    };
    Ok(Some(command))
}

/// `coffee-001x2` means two of `coffee-001`; anything else is a bare id
/// meaning one.
///
/// Quantities pass through unchecked so the order factory reports
/// fractional or non-positive ones.
fn parse_item(spec: &str) -> RequestedItem {
    spec.rsplit_once('x')
        .filter(|(id, qty)| {
            !id.is_empty()
                && !qty.is_empty()
                && qty.chars().all(|c| c.is_ascii_digit() || c == '.')
        })
        .and_then(|(id, qty)| qty.parse::<f64>().ok().map(|quantity| (id, quantity)))
        .map(|(id, quantity)| RequestedItem::new(id, quantity))
        .unwrap_or_else(|| RequestedItem::new(spec, 1.0))
}
