use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::FetchError;
use crate::payload::SaleInfo;

const CURRENT_PLAYERS_URL: &str =
    "https://api.steampowered.com/ISteamUserStats/GetNumberOfCurrentPlayers/v1/";
const APP_DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";

/// Blocking Steam client shared by every lookup in a run.
///
/// The timeout covers the whole request. When it elapses reqwest drops the
/// connection and the lookup fails like any other transport error.
pub struct SteamClient {
    http: Client,
    country: String,
}

impl SteamClient {
    pub fn new(timeout: Duration, country: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            country: country.to_string(),
        })
    }

    pub fn current_players(&self, appid: u32) -> Result<u64, FetchError> {
        let body = self.get(CURRENT_PLAYERS_URL, &[("appid", appid.to_string())])?;
        parse_player_count(&body)
    }

    pub fn sale_info(&self, appid: u32) -> Result<SaleInfo, FetchError> {
        let body = self.get(
            APP_DETAILS_URL,
            &[
                ("appids", appid.to_string()),
                ("filters", "price_overview".to_string()),
                ("cc", self.country.clone()),
            ],
        )?;
        parse_sale_info(&body, appid)
    }

    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let response = self.http.get(url).query(query).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(response.text()?)
    }
}

/// `{"response":{"player_count":n,"result":1}}`
pub fn parse_player_count(body: &str) -> Result<u64, FetchError> {
    let parsed = json::parse(body)?;

    parsed["response"]["player_count"]
        .as_u64()
        .ok_or(FetchError::MissingField("player_count"))
}

/// `{"<appid>":{"success":true,"data":{"price_overview":{"discount_percent":n}}}}`
///
/// Free titles come back with `"data": []`; no discount field means full price.
pub fn parse_sale_info(body: &str, appid: u32) -> Result<SaleInfo, FetchError> {
    let parsed = json::parse(body)?;
    let app = &parsed[appid.to_string().as_str()];

    if !app["success"].as_bool().unwrap_or(false) {
        return Err(FetchError::Unsuccessful(appid));
    }

    let discount = app["data"]["price_overview"]["discount_percent"]
        .as_u64()
        .unwrap_or(0)
        .min(100);

    Ok(SaleInfo::from_discount(discount as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use std::time::Instant;

    #[test]
    fn reads_player_count() {
        let body = r#"{"response":{"player_count":12345,"result":1}}"#;
        assert_eq!(parse_player_count(body).unwrap(), 12345);
    }

    #[test]
    fn missing_player_count_is_an_error() {
        let body = r#"{"response":{"result":42}}"#;
        assert!(matches!(
            parse_player_count(body),
            Err(FetchError::MissingField("player_count"))
        ));
    }

    #[test]
    fn html_instead_of_json_is_an_error() {
        let body = "<html><body>Service Unavailable</body></html>";
        assert!(matches!(parse_player_count(body), Err(FetchError::Json(_))));
    }

    #[test]
    fn reads_discount() {
        let body = r#"{"1364780":{"success":true,"data":{"price_overview":{
            "currency":"JPY","initial":599000,"final":389300,"discount_percent":35}}}}"#;
        let sale = parse_sale_info(body, 1364780).unwrap();
        assert_eq!(sale, SaleInfo { is_on_sale: true, discount_percent: 35 });
    }

    #[test]
    fn full_price_is_not_on_sale() {
        let body = r#"{"10":{"success":true,"data":{"price_overview":{"discount_percent":0}}}}"#;
        assert_eq!(parse_sale_info(body, 10).unwrap(), SaleInfo::from_discount(0));
    }

    #[test]
    fn free_title_has_no_discount() {
        let body = r#"{"245170":{"success":true,"data":[]}}"#;
        let sale = parse_sale_info(body, 245170).unwrap();
        assert!(!sale.is_on_sale);
        assert_eq!(sale.discount_percent, 0);
    }

    #[test]
    fn unsuccessful_lookup_is_an_error() {
        let body = r#"{"99":{"success":false}}"#;
        assert!(matches!(
            parse_sale_info(body, 99),
            Err(FetchError::Unsuccessful(99))
        ));
        assert!(parse_sale_info(r#"{"1":{"success":true}}"#, 2).is_err());
    }

    /// Serves a single connection on localhost, handing it to `respond`.
    fn serve_once<F>(respond: F) -> String
    where
        F: FnOnce(TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                respond(stream);
            }
        });
        url
    }

    #[test]
    fn silent_server_times_out() {
        let url = serve_once(|stream| {
            thread::sleep(Duration::from_secs(3));
            drop(stream);
        });
        let client = SteamClient::new(Duration::from_secs(1), "jp").unwrap();

        let started = Instant::now();
        let result = client.get(&url, &[("appid", "1".to_string())]);

        assert!(matches!(result, Err(FetchError::Http(ref e)) if e.is_timeout()));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn error_status_is_a_failed_fetch() {
        let url = serve_once(|mut stream| {
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(
                b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        });
        let client = SteamClient::new(Duration::from_secs(5), "jp").unwrap();

        let result = client.get(&url, &[("appid", "1".to_string())]);

        assert!(matches!(
            result,
            Err(FetchError::Status(status)) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[test]
    #[ignore] // Requires network access
    fn fetches_live_counts() {
        let client = SteamClient::new(Duration::from_secs(10), "jp").unwrap();
        assert!(client.current_players(1364780).is_ok());
        assert!(client.sale_info(1364780).is_ok());
    }
}
