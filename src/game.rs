use serde::{Deserialize, Serialize};

/// One row of the catalog: a title we track, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(alias = "identifier")]
    pub appid: Option<u32>,
    pub enabled: bool,
}

impl Game {
    pub fn new(id: &str, name: &str, appid: Option<u32>, enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            appid,
            enabled,
        }
    }

    /// The appid to query Steam with, if this game should be queried at all.
    pub fn tracked_appid(&self) -> Option<u32> {
        if !self.enabled {
            return None;
        }
        self.appid.filter(|&appid| appid != 0)
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.appid {
            Some(appid) => write!(f, "{} (appid={appid})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
