//! Naming rules for asset references found on chain.

use crate::domain::models::Asset;
use crate::infrastructure::rpc::types::ScriptAsset;

/// Placeholder parent used when a sub-asset's root is not indexed yet
pub const UNKNOWN_PARENT: &str = "UNKNOWN";

/// Separator between parent and leaf in sub-asset names
pub const SUB_ASSET_SEPARATOR: char = '|';

/// Strip a trailing `[n]` or `[lo...hi]` unit selector from an asset id.
///
/// Anything that does not match one of those two shapes is returned untouched.
pub fn strip_asset_suffix(asset_id: &str) -> &str {
    let Some(open) = asset_id.rfind('[') else {
        return asset_id;
    };
    let Some(inner) = asset_id[open + 1..].strip_suffix(']') else {
        return asset_id;
    };

    let is_index = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let valid = match inner.split_once("...") {
        Some((lo, hi)) => is_index(lo) && is_index(hi),
        None => is_index(inner),
    };

    if valid && open > 0 {
        &asset_id[..open]
    } else {
        asset_id
    }
}

/// Display name of a sub-asset: `PARENT|leaf`, parent upper-cased
pub fn sub_asset_name(parent_name: &str, leaf: &str) -> String {
    format!(
        "{}{}{}",
        parent_name.to_uppercase(),
        SUB_ASSET_SEPARATOR,
        leaf
    )
}

/// Whether an output's asset marker names `asset`, by unit-stripped id or by name
pub(super) fn matches_marker(asset: &Asset, marker: &ScriptAsset) -> bool {
    let by_id = marker
        .asset_id
        .as_deref()
        .map_or(false, |id| strip_asset_suffix(id) == asset.asset_id);
    let by_name = marker.name.as_deref().map_or(false, |name| name == asset.name);
    by_id || by_name
}

pub(super) fn marker_label(marker: &ScriptAsset) -> &str {
    marker
        .asset_id
        .as_deref()
        .or(marker.name.as_deref())
        .unwrap_or("<unnamed>")
}
