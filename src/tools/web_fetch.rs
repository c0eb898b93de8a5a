use url::Url;

use crate::eval::{RuleMatch, ToolInvocation};
use crate::rules::{FetchRule, Rule};
use crate::tools::{ToolResolver, resolve_subject};

/// Resolver for the `WebFetch` tool, matching `domain` patterns against the
/// hostname of the `url` input.
pub struct WebFetchResolver;

impl ToolResolver for WebFetchResolver {
    fn resolve(&self, invocation: &ToolInvocation, rules: &[&Rule]) -> Vec<RuleMatch> {
        let Some(raw) = invocation.text("url") else {
            return Vec::new();
        };
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("unparseable url {raw:?}: {e}");
                return Vec::new();
            }
        };
        let hostname = url.host_str().unwrap_or_default();

        let fetch_rules: Vec<&FetchRule> = rules.iter().filter_map(|&r| r.as_fetch()).collect();
        resolve_subject(&fetch_rules, hostname, FetchRule::domain, FetchRule::to_match)
    }
}
