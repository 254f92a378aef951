use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{FetchWindow, FundCode, FundMetadata, NavRecord, NavSeries};
use crate::fetch::{FetchError, FetchErrorKind, HistoryRequest, NavSource};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient, DEFAULT_TIMEOUT_MS};
use crate::pacing::FetchPacer;
use crate::parse::parse_history_page;

pub const HISTORY_ENDPOINT: &str = "http://fund.eastmoney.com/f10/F10DataApi.aspx";
pub const SEARCH_ENDPOINT: &str =
    "http://fundsuggest.eastmoney.com/FundSearch/api/FundSearchAPI.ashx";

/// Rows per history page; the endpoint defaults to 20 and caps at 49.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Widest date window the history endpoint answers reliably.
pub const MAX_WINDOW_DAYS: i64 = 90;

const REFERER: &str = "http://fund.eastmoney.com/";
const MONEY_FUND_MARKER: &str = "货币";

/// NAV source backed by the Eastmoney F10 history and fund-search endpoints.
pub struct EastmoneyAdapter {
    http_client: Arc<dyn HttpClient>,
    pacer: FetchPacer,
    page_size: usize,
    timeout_ms: u64,
}

impl Default for EastmoneyAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            pacer: FetchPacer::default(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl EastmoneyAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    pub fn with_pacer(mut self, pacer: FetchPacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn history_url(&self, fund_code: &FundCode, window: Option<&FetchWindow>, page: usize) -> String {
        let mut url = format!(
            "{HISTORY_ENDPOINT}?type=lsjz&code={}&per={}&page={page}",
            fund_code.as_str(),
            self.page_size,
        );
        if let Some(window) = window {
            url.push_str(&format!(
                "&sdate={}&edate={}",
                window.start.format_iso(),
                window.end.format_iso()
            ));
        }
        url
    }

    fn search_url(fund_code: &FundCode) -> String {
        format!(
            "{SEARCH_ENDPOINT}?m=1&key={}",
            urlencoding::encode(fund_code.as_str())
        )
    }

    async fn fetch_body(&self, url: String) -> Result<String, FetchError> {
        let request = HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.retryable() {
                FetchError::transient(e.message().to_owned())
            } else {
                FetchError::invalid_request(e.message().to_owned())
            }
        })?;

        if !response.is_success() {
            return Err(FetchError::transient(format!(
                "upstream returned status {}",
                response.status
            )));
        }

        Ok(response.body)
    }

    /// Walk one window (or the full history) page by page, newest rows first.
    ///
    /// A failure on the first page means nothing was fetched and the error
    /// propagates; a failure on a later page ends the walk with the rows
    /// gathered so far.
    async fn fetch_paged(
        &self,
        fund_code: &FundCode,
        window: Option<&FetchWindow>,
    ) -> Result<Vec<NavRecord>, FetchError> {
        let mut collected: Vec<NavRecord> = Vec::new();
        let mut page = 1usize;

        loop {
            self.pacer.pause(page - 1).await;

            let url = self.history_url(fund_code, window, page);
            let body = match self.fetch_body(url).await {
                Ok(body) => body,
                Err(err) if page == 1 => return Err(err),
                Err(err) => {
                    warn!(
                        fund_code = fund_code.as_str(),
                        page,
                        error = %err,
                        "pagination aborted, keeping rows fetched so far"
                    );
                    break;
                }
            };

            let parsed = match parse_history_page(&body) {
                Ok(parsed) => parsed,
                Err(failure) if page == 1 => {
                    return Err(FetchError::no_data(format!(
                        "first history page unparsable: {failure}"
                    )));
                }
                Err(failure) => {
                    debug!(
                        fund_code = fund_code.as_str(),
                        page,
                        error = %failure,
                        "unparsable page treated as end of data"
                    );
                    break;
                }
            };

            let row_count = parsed.records.len();
            collected.extend(parsed.records);
            debug!(fund_code = fund_code.as_str(), page, row_count, "fetched history page");

            if row_count == 0 {
                break;
            }
            let has_next = parsed.has_next.unwrap_or(row_count >= self.page_size);
            if !has_next {
                break;
            }
            page += 1;
        }

        Ok(collected)
    }

    async fn fetch_history(&self, request: HistoryRequest) -> Result<NavSeries, FetchError> {
        let fund_code = request.fund_code;
        let mut records: Vec<NavRecord> = Vec::new();

        match request.window {
            None => {
                records.extend(self.fetch_paged(&fund_code, None).await?);
            }
            Some(window) if window.span_days() <= MAX_WINDOW_DAYS => {
                records.extend(self.fetch_paged(&fund_code, Some(&window)).await?);
            }
            Some(window) => {
                // Wide windows are walked segment by segment; a segment with
                // no published rows is skipped rather than failing the whole
                // request.
                for segment in window.split(MAX_WINDOW_DAYS) {
                    match self.fetch_paged(&fund_code, Some(&segment)).await {
                        Ok(rows) => records.extend(rows),
                        Err(err) if err.kind() == FetchErrorKind::NoData => continue,
                        Err(err) if records.is_empty() => return Err(err),
                        Err(err) => {
                            warn!(
                                fund_code = fund_code.as_str(),
                                error = %err,
                                "segmented fetch aborted, keeping earlier segments"
                            );
                            break;
                        }
                    }
                }
            }
        }

        if records.is_empty() {
            return Err(FetchError::no_data(format!(
                "no NAV rows published for fund {fund_code}"
            )));
        }

        Ok(NavSeries::from_records(fund_code, records))
    }

    async fn fetch_metadata(&self, fund_code: FundCode) -> FundMetadata {
        let url = Self::search_url(&fund_code);
        let body = match self.fetch_body(url).await {
            Ok(body) => body,
            Err(err) => {
                debug!(fund_code = fund_code.as_str(), error = %err, "metadata lookup failed");
                return FundMetadata::unknown(fund_code);
            }
        };

        let response: SearchResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(err) => {
                debug!(fund_code = fund_code.as_str(), error = %err, "metadata payload unparsable");
                return FundMetadata::unknown(fund_code);
            }
        };

        let Some(hit) = response
            .datas
            .into_iter()
            .find(|item| item.code == fund_code.as_str())
        else {
            debug!(fund_code = fund_code.as_str(), "no exact match in search results");
            return FundMetadata::unknown(fund_code);
        };

        let base = hit.base_info.unwrap_or_default();
        let fund_type = non_empty_or_unknown(base.fund_type);
        let is_money_fund = fund_type.contains(MONEY_FUND_MARKER);

        FundMetadata {
            fund_code,
            fund_name: non_empty_or_unknown(hit.name),
            fund_company: non_empty_or_unknown(base.company),
            fund_type,
            is_money_fund,
        }
    }
}

fn non_empty_or_unknown(value: Option<String>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => crate::domain::UNKNOWN_FIELD.to_owned(),
    }
}

impl NavSource for EastmoneyAdapter {
    fn history<'a>(
        &'a self,
        request: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<NavSeries, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch_history(request))
    }

    fn lookup<'a>(
        &'a self,
        fund_code: FundCode,
    ) -> Pin<Box<dyn Future<Output = FundMetadata> + Send + 'a>> {
        Box::pin(self.fetch_metadata(fund_code))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Datas", default)]
    datas: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItem {
    #[serde(rename = "CODE", default)]
    code: String,
    #[serde(rename = "NAME", default)]
    name: Option<String>,
    #[serde(rename = "FundBaseInfo", default)]
    base_info: Option<SearchBaseInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchBaseInfo {
    #[serde(rename = "JJGS", default)]
    company: Option<String>,
    #[serde(rename = "FUNDTYPE", default)]
    fund_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalendarDate;

    fn code() -> FundCode {
        FundCode::parse("161725").expect("code should parse")
    }

    #[test]
    fn history_url_includes_window_bounds() {
        let adapter = EastmoneyAdapter::default();
        let window = FetchWindow::new(
            CalendarDate::parse("2024-01-01").expect("must parse"),
            CalendarDate::parse("2024-02-01").expect("must parse"),
        )
        .expect("valid window");

        let url = adapter.history_url(&code(), Some(&window), 2);

        assert!(url.starts_with(HISTORY_ENDPOINT));
        assert!(url.contains("type=lsjz"));
        assert!(url.contains("code=161725"));
        assert!(url.contains("per=20"));
        assert!(url.contains("page=2"));
        assert!(url.contains("sdate=2024-01-01"));
        assert!(url.contains("edate=2024-02-01"));
    }

    #[test]
    fn full_history_url_omits_window_bounds() {
        let adapter = EastmoneyAdapter::default();
        let url = adapter.history_url(&code(), None, 1);
        assert!(!url.contains("sdate"));
        assert!(!url.contains("edate"));
    }

    #[tokio::test]
    async fn noop_transport_yields_no_data() {
        let adapter = EastmoneyAdapter::default().with_pacer(FetchPacer::disabled());

        let err = adapter
            .history(HistoryRequest::full_history(code()))
            .await
            .expect_err("noop body has no table");

        assert_eq!(err.kind(), FetchErrorKind::NoData);
    }

    #[tokio::test]
    async fn noop_transport_degrades_metadata_to_unknown() {
        let adapter = EastmoneyAdapter::default();

        let metadata = adapter.lookup(code()).await;

        assert_eq!(metadata.fund_name, crate::domain::UNKNOWN_FIELD);
        assert!(!metadata.is_money_fund);
    }
}
