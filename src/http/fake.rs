//! Scripted transport for unit tests

use super::types::{HttpResponseSignature, HttpTransport, Page, LINK_HEADER};
use crate::auth::Authentication;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

enum Scripted {
    Page(Page),
    Status(u16),
}

/// Transport that replays canned responses per URL and records every call
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 page for `url`, optionally carrying a `Link` header
    pub fn page(self, url: &str, body: &str, link: Option<&str>) -> Self {
        let mut page = Page::new(url, 200, body);
        if let Some(link) = link {
            page.headers
                .insert(LINK_HEADER, HeaderValue::from_str(link).unwrap());
        }
        self.push(url, Scripted::Page(page))
    }

    /// Queue a failure status for `url`
    pub fn failure(self, url: &str, status: u16) -> Self {
        self.push(url, Scripted::Status(status))
    }

    fn push(self, url: &str, scripted: Scripted) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(scripted);
        self
    }

    /// URLs fetched so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Identities used so far, in order
    pub fn identities(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, identity)| identity.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn fetch(
        &self,
        url: &str,
        auth: &dyn Authentication,
        _api_name: &str,
        allowlist: &[HttpResponseSignature],
    ) -> Result<Page> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), auth.identity().to_string()));

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Page(page)) => Ok(page),
            Some(Scripted::Status(status)) => {
                if super::types::is_allowlisted(allowlist, status, "") {
                    let mut page = Page::new(url, status, "");
                    page.allowlisted = true;
                    Ok(page)
                } else {
                    Err(Error::http_status(status, "scripted failure"))
                }
            }
            None => Err(Error::http_status(404, format!("no scripted response for {url}"))),
        }
    }
}
