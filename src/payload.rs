use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::FetchError;
use crate::game::Game;
use crate::links::derive_links;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInfo {
    pub is_on_sale: bool,
    pub discount_percent: u8,
}

impl SaleInfo {
    pub fn from_discount(discount_percent: u8) -> Self {
        let discount_percent = discount_percent.min(100);
        Self {
            is_on_sale: discount_percent > 0,
            discount_percent,
        }
    }
}

/// One output row. `None` means "unknown", never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerItem {
    pub id: String,
    pub name: String,
    pub appid: Option<u32>,
    pub player_count: Option<u64>,
    pub is_on_sale: Option<bool>,
    pub discount_percent: Option<u8>,
    pub store_url: Option<String>,
    pub run_url: Option<String>,
}

impl PlayerItem {
    fn untracked(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            name: game.name.clone(),
            appid: game.appid,
            player_count: None,
            is_on_sale: None,
            discount_percent: None,
            store_url: None,
            run_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(serialize_with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
    pub items: Vec<PlayerItem>,
}

fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Fetches every tracked game once, in catalog order, and falls back to the
/// previous payload's values for whatever failed.
///
/// A failed fetch is logged and never ends the run. Disabled games and games
/// without an appid are emitted with every metric unset and are not fetched.
pub fn build_payload<M, S>(
    games: &[Game],
    previous: Option<&Payload>,
    mut fetch_players: M,
    mut fetch_sale: S,
) -> Payload
where
    M: FnMut(u32) -> Result<u64, FetchError>,
    S: FnMut(u32) -> Result<SaleInfo, FetchError>,
{
    let previous: HashMap<&str, &PlayerItem> = previous
        .map(|payload| {
            payload
                .items
                .iter()
                .map(|item| (item.id.as_str(), item))
                .collect()
        })
        .unwrap_or_default();

    let mut items = Vec::with_capacity(games.len());

    for game in games {
        let links = derive_links(game.appid);

        let Some(appid) = game.tracked_appid() else {
            items.push(PlayerItem::untracked(game));
            continue;
        };

        let fallback = previous.get(game.id.as_str()).copied();

        let player_count = match fetch_players(appid) {
            Ok(count) => {
                debug!("{game}: {count} players");
                Some(count)
            }
            Err(e) => {
                warn!("Failed to fetch player count for appid={appid}: {e}");
                fallback.and_then(|item| item.player_count)
            }
        };

        let (is_on_sale, discount_percent) = match fetch_sale(appid) {
            Ok(sale) => {
                debug!("{game}: {}% off", sale.discount_percent);
                (Some(sale.is_on_sale), Some(sale.discount_percent))
            }
            Err(e) => {
                warn!("Failed to fetch sale info for appid={appid}: {e}");
                fallback
                    .map(|item| (item.is_on_sale, item.discount_percent))
                    .unwrap_or((None, None))
            }
        };

        items.push(PlayerItem {
            id: game.id.clone(),
            name: game.name.clone(),
            appid: game.appid,
            player_count,
            is_on_sale,
            discount_percent,
            store_url: links.store_url,
            run_url: links.run_url,
        });
    }

    Payload {
        updated_at: Utc::now(),
        items,
    }
}
