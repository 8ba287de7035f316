use std::future::Future;
use std::time::Duration;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use crate::error::LookupError;
use crate::postal::model::{interpret_response, Pincode, PostOfficeRecord};

pub mod model;

pub const DEFAULT_BASE_URL: &str = "https://api.postalpincode.in";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const UA: &str = concat!("pincode-lookup/", env!("CARGO_PKG_VERSION"));

/// Source of post office data for a pincode
pub trait PostalApi {
    /// fetch the raw response body for `pincode`
    fn fetch_body(&self, pincode: &Pincode) -> impl Future<Output = Result<String, LookupError>> + Send;

    /// fetch and interpret in one go
    fn lookup(&self, pincode: &Pincode) -> impl Future<Output = Result<Vec<PostOfficeRecord>, LookupError>> + Send
    where
        Self: Sync,
    {
        async move {
            let body = self.fetch_body(pincode).await?;
            interpret_response(&body)
        }
    }
}

/// HTTP client for api.postalpincode.in
pub struct PostalClient {
    client: Client,
    base_url: String,
}

impl PostalClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> color_eyre::Result<Self> {
        Ok(
            Self {
                client: Client::builder()
                    .default_headers(Self::default_headers())
                    .timeout(timeout)
                    .build()?,
                base_url: base_url.into().trim_end_matches('/').to_owned(),
            }
        )
    }

    fn default_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, HeaderValue::from_static(UA));
        map
    }

    fn url_for(&self, pincode: &Pincode) -> String {
        format!("{}/pincode/{}", self.base_url, pincode)
    }
}

impl PostalApi for PostalClient {
    async fn fetch_body(&self, pincode: &Pincode) -> Result<String, LookupError> {
        let url = self.url_for(pincode);
        debug!("requesting [{}]", url);
        let fut = async {
            let resp = self.client.get(&url).send().await?;
            // the body decides success or failure, not the status line
            debug!("[{}] answered with {}", url, resp.status());
            Ok::<_, reqwest::Error>(resp.text().await?)
        };
        fut.await.map_err(|err| {
            warn!("request to [{}] failed: {:?}", url, err);
            LookupError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response, returning the base URL.
    async fn serve_once(body: &'static str) -> std::io::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let resp = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(resp.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Ok(format!("http://{addr}"))
    }

    #[tokio::test]
    async fn fetches_and_interprets_records() -> color_eyre::Result<()> {
        let base = serve_once(r#"[{"Status":"Success","PostOffice":[{"Name":"Alpha","Pincode":"110001","District":"D1","State":"S1"}]}]"#).await?;
        let client = PostalClient::new(base, Duration::from_secs(5))?;
        let records = client.lookup(&Pincode::parse("110001")?).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Alpha"));
        Ok(())
    }

    #[tokio::test]
    async fn hung_server_hits_timeout() -> color_eyre::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            // accept and hold the connection open without answering
            let conn = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(conn);
        });

        let client = PostalClient::new(format!("http://{addr}/"), Duration::from_millis(200))?;
        let err = client.fetch_body(&Pincode::parse("110001")?).await.unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
        server.abort();
        Ok(())
    }

    #[test]
    fn url_has_no_double_slash() -> color_eyre::Result<()> {
        let client = PostalClient::new("https://example.test/", DEFAULT_TIMEOUT)?;
        assert_eq!(
            client.url_for(&Pincode::parse("560001")?),
            "https://example.test/pincode/560001"
        );
        Ok(())
    }
}
