// tests/search_e2e.rs
// End-to-end: real reqwest transport against a local mockito server standing
// in for the registry.

use mockito::{Matcher, Server, ServerGuard};

use fmcsa_search::export::{read_csv, to_csv_string};
use fmcsa_search::{NullProgress, PipelineError, ScrapeConfig, Scraper, COLUMNS};

const SEARCH_PAGE: &str = r#"<html><body>
<table><tr><td><img src="logo.gif"></td></tr></table>
<table><tr><td>Search Criteria</td></tr></table>
<table>
  <tr><th>CARRIER/DBA NAME</th><th>LOCATION</th></tr>
  <tr><th><a href="query.asp?n=1">ACME HAULING LLC</a></th><td>DALLAS, TX</td></tr>
  <tr><td>&nbsp;</td></tr>
  <tr><th><a href="query.asp?n=2">ACME, FREIGHT &amp; SONS</a></th><td>RENO, NV</td></tr>
</table>
</body></html>"#;

fn detail_page(power_units: &str) -> String {
    let mut rows = String::new();
    for i in 1..=18 {
        if i == 17 {
            rows.push_str(&format!("<tr><td>{power_units}</td><td>Drivers:</td></tr>"));
        } else {
            rows.push_str(&format!("<tr><th>label {i}</th></tr>"));
        }
    }
    format!("<html><body><table>{rows}</table></body></html>")
}

fn scraper_for(server: &ServerGuard) -> Scraper {
    let config = ScrapeConfig::default().with_origin(server.url());
    Scraper::new(config).unwrap()
}

#[tokio::test]
async fn search_enriches_rows_and_isolates_http_errors() {
    let mut server = Server::new_async().await;

    let search = server
        .mock("GET", "/keywordx.asp")
        .match_query(Matcher::UrlEncoded("searchstring".into(), "*ACME*".into()))
        .with_status(200)
        .with_body(SEARCH_PAGE)
        .expect(1)
        .create_async()
        .await;
    let first = server
        .mock("GET", "/query.asp?n=1")
        .with_status(200)
        .with_body(detail_page(" 7 "))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/query.asp?n=2")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let scraper = scraper_for(&server);
    let table = scraper.run("acme", &mut NullProgress).await.unwrap();

    assert_eq!(table.len(), 2);
    let rows = table.rows();
    assert_eq!(rows[0].name, "ACME HAULING LLC");
    assert_eq!(rows[0].carrier_link, format!("{}/query.asp?n=1", server.url()));
    assert_eq!(rows[0].power_units.to_string(), "7");
    assert_eq!(rows[1].name, "ACME, FREIGHT & SONS");
    assert!(rows[1].power_units.to_string().contains("404"));

    // A second identical search is answered entirely from the cache
    let again = scraper.run("ACME", &mut NullProgress).await.unwrap();
    assert_eq!(again, table);

    search.assert_async().await;
    first.assert_async().await;
    second.assert_async().await;

    let csv = to_csv_string(&table).unwrap();
    let (headers, records) = read_csv(csv.as_bytes()).unwrap();
    assert_eq!(headers, COLUMNS.to_vec());
    assert_eq!(records.len(), 2);
    assert_eq!(records[1][0], "ACME, FREIGHT & SONS");
    assert_eq!(records[1][3], "Error: HTTP 404");
}

#[tokio::test]
async fn search_page_error_fails_the_run() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/keywordx.asp")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let scraper = scraper_for(&server);
    let err = scraper.run("acme", &mut NullProgress).await.unwrap_err();

    assert!(matches!(err, PipelineError::SearchFetchFailed(_)));
    assert!(err.to_string().contains("500"));
    search.assert_async().await;
}

#[tokio::test]
async fn empty_term_never_reaches_the_server() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let scraper = scraper_for(&server);
    let err = scraper.run("  ", &mut NullProgress).await.unwrap_err();

    assert!(matches!(err, PipelineError::EmptyInput));
    any.assert_async().await;
}

#[tokio::test]
async fn detail_page_is_decoded_with_its_declared_charset() {
    let mut server = Server::new_async().await;

    let single_row = r#"<html><body>
<table><tr><td>banner</td></tr></table>
<table><tr><td>form</td></tr></table>
<table>
  <tr><th>CARRIER/DBA NAME</th><th>LOCATION</th></tr>
  <tr><th><a href="query.asp?n=1">CAFE FREIGHT</a></th><td>AUSTIN, TX</td></tr>
</table>
</body></html>"#;

    // windows-1252 page: 0xC9 is 'É', which is not valid UTF-8 on its own
    let latin_page: Vec<u8> = detail_page("CAF@ LOGISTICS")
        .bytes()
        .map(|b| if b == b'@' { 0xC9 } else { b })
        .collect();

    let search = server
        .mock("GET", "/keywordx.asp")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(single_row)
        .create_async()
        .await;
    let detail = server
        .mock("GET", "/query.asp?n=1")
        .with_status(200)
        .with_header("content-type", "text/html; charset=windows-1252")
        .with_body(latin_page)
        .create_async()
        .await;

    let scraper = scraper_for(&server);
    let table = scraper.run("cafe", &mut NullProgress).await.unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].power_units.to_string(), "CAFÉ LOGISTICS");

    search.assert_async().await;
    detail.assert_async().await;
}

#[tokio::test]
async fn origin_without_trailing_slash_still_finds_search_page() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/keywordx.asp")
        .match_query(Matcher::UrlEncoded("searchstring".into(), "*ACME*".into()))
        .with_status(200)
        .with_body(SEARCH_PAGE)
        .expect(1)
        .create_async()
        .await;
    let details = server
        .mock("GET", Matcher::Regex(r"^/query\.asp".into()))
        .with_status(200)
        .with_body(detail_page("3"))
        .expect(2)
        .create_async()
        .await;

    // server.url() has no trailing '/'
    let config = ScrapeConfig {
        origin: server.url(),
        ..ScrapeConfig::default()
    };
    let scraper = Scraper::new(config).unwrap();
    let table = scraper.run("acme", &mut NullProgress).await.unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1].carrier_link, format!("{}/query.asp?n=2", server.url()));
    search.assert_async().await;
    details.assert_async().await;
}
