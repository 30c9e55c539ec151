//! Typed HTTP client for the products resource.
//!
//! Mirrors the calls the list and edit views make: page through books, load
//! one for editing, create a new one and save changes back.

use serde::Serialize;

use catalog_core::{PageRequest, PaginationResult, ProductId};
use catalog_products::Product;

pub type Book = Product;

/// A book as submitted for creation. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBook {
    pub name: String,
    pub price: f64,
}

impl NewBook {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct BookClient {
    base_url: String,
    http: reqwest::Client,
}

impl BookClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/api/products/{}", self.base_url, id)
    }

    fn page_url(&self, page_number: i32, page_size: i32) -> String {
        format!(
            "{}?pageNumber={}&pageSize={}",
            self.products_url(),
            page_number,
            page_size
        )
    }

    /// First page of books with the default page size.
    pub async fn get_books(&self) -> ClientResult<Vec<Book>> {
        let page = self
            .get_books_page(PageRequest::DEFAULT_PAGE_NUMBER, PageRequest::DEFAULT_PAGE_SIZE)
            .await?;
        Ok(page.result)
    }

    pub async fn get_books_page(
        &self,
        page_number: i32,
        page_size: i32,
    ) -> ClientResult<PaginationResult<Book>> {
        let resp = send(self.http.get(self.page_url(page_number, page_size))).await?;
        parse(resp).await
    }

    pub async fn get_book_by_id(&self, id: impl Into<ProductId>) -> ClientResult<Book> {
        let resp = send(self.http.get(self.product_url(id.into()))).await?;
        parse(resp).await
    }

    /// Returns the server's verdict on whether the book was stored.
    pub async fn create_book(&self, book: &NewBook) -> ClientResult<bool> {
        let resp = send(self.http.post(self.products_url()).json(book)).await?;
        parse(resp).await
    }

    pub async fn update_book(&self, id: impl Into<ProductId>, book: &Book) -> ClientResult<()> {
        send(self.http.put(self.product_url(id.into())).json(book)).await?;
        Ok(())
    }

    pub async fn check_health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

async fn send(req: reqwest::RequestBuilder) -> ClientResult<reqwest::Response> {
    let resp = req
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(resp)
}

async fn parse<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
}
