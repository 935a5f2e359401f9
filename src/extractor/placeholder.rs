//! Terminal "strategy": a static document shown when every real strategy
//! failed. By construction it cannot fail, so extraction never leaves the
//! caller with nothing to render.

use url::Url;

pub fn placeholder_document(url: &Url) -> String {
    format!(
        r#"<div class="content-unavailable">
  <h1>Essay Content Unavailable</h1>
  <p>We couldn't load this essay at the moment. Here's what you can do:</p>
  <ul>
    <li>Refresh the page to try again.</li>
    <li>Read the essay directly at <a href="{url}">{url}</a>.</li>
    <li>Try another essay from the list.</li>
  </ul>
</div>"#
    )
}
