//! CLI-side argument checks: `KEY=VALUE` parameter pairs are parsed and
//! range-checked here, so a bad value aborts before anything is submitted.

use std::str::FromStr;

use clap::ArgMatches;

use scrub_core::error::{ScrubError, ValidationError};
use scrub_core::params::{LlmParameters, ParamField};
use scrub_core::providers::ProviderKind;

/// Split one `KEY=VALUE` argument. The value may itself contain `=`
/// (model names sometimes do); only the first one splits.
pub fn parse_key_value_pair(raw: &str) -> Result<(&str, &str), ValidationError> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ValidationError::MalformedPair(raw.to_string()))
}

/// Fold every `--param KEY=VALUE` occurrence into a parameter set.
///
/// Each pair goes through the field's own edit rules, so an unknown key,
/// a malformed number, or an out-of-range value is rejected here and the
/// submission never happens. An empty set collapses to `None` so the
/// request omits the `parameters` object entirely.
pub fn collect_parameters(matches: &ArgMatches) -> Result<Option<LlmParameters>, ScrubError> {
    let Some(values) = matches.get_many::<String>("param") else {
        return Ok(None);
    };
    let mut params = LlmParameters::default();
    for raw in values {
        let (key, value) = parse_key_value_pair(raw)?;
        let field = ParamField::parse(key)?;
        params.apply_edit(field, value)?;
    }
    Ok(if params.is_empty() { None } else { Some(params) })
}

/// Provider chosen on the command line (clap supplies the default),
/// canonicalized to its wire name so aliases like `local` and mixed-case
/// spellings match the backend's provider list. Unknown names pass
/// through unchanged and the backend stays the authority on them.
pub fn provider_name(matches: &ArgMatches) -> String {
    let raw = matches
        .get_one::<String>("provider")
        .cloned()
        .unwrap_or_else(|| "anthropic".to_string());
    ProviderKind::from_str(&raw)
        .map(|kind| kind.wire_name())
        .unwrap_or(raw)
}
