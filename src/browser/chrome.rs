use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::app::{MagpieError, Result};
use crate::browser::{DomHandle, Key, Surface};
use crate::config::BrowserSettings;

/// How often `find_one` re-queries the DOM while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chrome-backed automation surface using chromiumoxide.
///
/// One surface owns one browser process and one page for its whole
/// lifetime. Callers must invoke [`ChromeSurface::close`] on every exit
/// path so the external Chrome process is not leaked.
pub struct ChromeSurface {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromeSurface {
    /// Launch a browser and open a blank page.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !settings.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| MagpieError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            MagpieError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Drain browser events
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| MagpieError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = settings.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| MagpieError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Shut the browser down and reap its process.
    pub async fn close(mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| MagpieError::Browser(format!("Failed to close browser: {}", e)));

        let _ = self.browser.wait().await;
        self.handler_task.abort();

        closed.map(|_| ())
    }
}

#[async_trait]
impl Surface for ChromeSurface {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| MagpieError::Browser(format!("Navigation to {} failed: {}", url, e)))?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| MagpieError::Browser(format!("Navigation to {} failed: {}", url, e)))?;

        Ok(())
    }

    async fn find_one(&self, selector: &str, timeout: Duration) -> Result<Box<dyn DomHandle>> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.page.find_element(selector).await {
                Ok(element) => return Ok(Box::new(ChromeHandle { element })),
                Err(_) if Instant::now() < deadline => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(_) => {
                    return Err(MagpieError::RenderTimeout {
                        selector: selector.to_string(),
                        secs: timeout.as_secs_f64(),
                    })
                }
            }
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn DomHandle>>> {
        // querySelectorAll with zero matches errors in chromiumoxide;
        // the engine treats "none found" as an empty set.
        let elements = match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(_) => Vec::new(),
        };

        Ok(elements
            .into_iter()
            .map(|element| Box::new(ChromeHandle { element }) as Box<dyn DomHandle>)
            .collect())
    }

    async fn run_script(&self, script: &str) -> Result<serde_json::Value> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| MagpieError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| MagpieError::Browser(format!("Failed to parse script result: {:?}", e)))
    }
}

struct ChromeHandle {
    element: Element,
}

#[async_trait]
impl DomHandle for ChromeHandle {
    async fn text(&self) -> Result<String> {
        let text = self
            .element
            .inner_text()
            .await
            .map_err(|e| MagpieError::Browser(format!("Failed to read element text: {}", e)))?;

        Ok(text.unwrap_or_default())
    }

    async fn press_key(&self, key: Key) -> Result<()> {
        self.element
            .press_key(key.as_dom_key())
            .await
            .map_err(|e| MagpieError::Browser(format!("Key dispatch failed: {}", e)))?;

        Ok(())
    }

    async fn force_click(&self) -> Result<()> {
        self.element
            .call_js_fn("function() { this.click(); }", false)
            .await
            .map_err(|e| MagpieError::Browser(format!("Scripted click failed: {}", e)))?;

        Ok(())
    }
}
