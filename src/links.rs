#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkData {
    pub store_url: Option<String>,
    pub run_url: Option<String>,
}

/// Store page and launch URI for an appid. Zero counts as no appid.
pub fn derive_links(appid: Option<u32>) -> LinkData {
    match appid {
        Some(appid) if appid != 0 => LinkData {
            store_url: Some(format!("https://store.steampowered.com/app/{appid}/")),
            run_url: Some(format!("steam://run/{appid}")),
        },
        _ => LinkData::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_appid_has_no_links() {
        assert_eq!(derive_links(None), LinkData::default());
        assert_eq!(derive_links(Some(0)), LinkData::default());
    }

    #[test]
    fn appid_builds_store_and_run_links() {
        let links = derive_links(Some(123));
        assert_eq!(
            links.store_url.as_deref(),
            Some("https://store.steampowered.com/app/123/")
        );
        assert_eq!(links.run_url.as_deref(), Some("steam://run/123"));
    }
}
