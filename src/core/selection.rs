//! Selection sets and token resolution
//!
//! Raw CLI tokens are resolved against a closed vocabulary per axis. The
//! sentinels `all` and `none` override individual member selection; the
//! first sentinel encountered locks the set and every later token is
//! ignored. Axes with no valid token at all fall back to a configured
//! default, with a warning.

use std::collections::BTreeMap;

use crate::core::report::Reporter;

/// Sentinel token selecting every member of an axis
pub const ALL_TOKEN: &str = "all";

/// Sentinel token clearing every member of an axis
pub const NONE_TOKEN: &str = "none";

/// A member of a closed selection vocabulary
pub trait AxisMember: Copy + Eq + 'static {
    /// Axis name used in warnings, e.g. "platform"
    const AXIS: &'static str;

    /// Every member of the axis, in display order
    const MEMBERS: &'static [Self];

    /// The CLI token naming this member
    fn token(self) -> &'static str;
}

/// Which sentinels an axis accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelSupport {
    /// Only `all` is reserved; `none` would be an unrecognized token
    AllOnly,
    /// Both `all` and `none` are reserved
    AllAndNone,
}

/// How an axis resolves when no valid token was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDefault {
    AllOn,
    AllOff,
}

/// A raw token classified against an axis vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionToken<K> {
    Member(K),
    All,
    None,
    Unrecognized(String),
}

/// Classify one raw token. Matching is ASCII-case-insensitive.
pub fn classify<K: AxisMember>(raw: &str, sentinels: SentinelSupport) -> ResolutionToken<K> {
    if raw.eq_ignore_ascii_case(ALL_TOKEN) {
        return ResolutionToken::All;
    }
    if sentinels == SentinelSupport::AllAndNone && raw.eq_ignore_ascii_case(NONE_TOKEN) {
        return ResolutionToken::None;
    }
    match K::MEMBERS
        .iter()
        .copied()
        .find(|member| member.token().eq_ignore_ascii_case(raw))
    {
        Some(member) => ResolutionToken::Member(member),
        None => ResolutionToken::Unrecognized(raw.to_string()),
    }
}

/// Fixed-key mapping from axis members to their selected state
///
/// The key set is the axis's full vocabulary and never changes; only the
/// boolean values mutate, and only during resolution.
#[derive(Debug, Clone)]
pub struct SelectionSet<K: AxisMember> {
    members: Vec<(K, bool)>,
}

impl<K: AxisMember> SelectionSet<K> {
    /// A set with every member unselected
    pub fn none_selected() -> Self {
        Self {
            members: K::MEMBERS.iter().map(|member| (*member, false)).collect(),
        }
    }

    pub fn is_selected(&self, key: K) -> bool {
        self.members
            .iter()
            .any(|(member, selected)| *member == key && *selected)
    }

    /// The selected members, in vocabulary order
    pub fn selected(&self) -> impl Iterator<Item = K> + '_ {
        self.members
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(member, _)| *member)
    }

    pub fn any_selected(&self) -> bool {
        self.members.iter().any(|(_, selected)| *selected)
    }

    /// Token-keyed view of the set, for summaries
    pub fn to_token_map(&self) -> BTreeMap<&'static str, bool> {
        self.members
            .iter()
            .map(|(member, selected)| (member.token(), *selected))
            .collect()
    }

    pub(crate) fn select(&mut self, key: K) {
        for (member, selected) in &mut self.members {
            if *member == key {
                *selected = true;
            }
        }
    }

    pub(crate) fn set_all(&mut self, value: bool) {
        for (_, selected) in &mut self.members {
            *selected = value;
        }
    }
}

/// Resolution fold state: the first sentinel locks the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveState {
    Accumulating,
    LockedAll,
    LockedNone,
}

/// Resolve a raw token list into a selection set
///
/// Tokens are folded left to right. Member tokens accumulate; the first
/// sentinel locks the whole set and later tokens are ignored. Unrecognized
/// tokens warn and are skipped. When no token was valid, `default` is
/// applied and a warning names the fallback.
pub fn resolve<K: AxisMember>(
    raw_tokens: &[String],
    sentinels: SentinelSupport,
    default: AxisDefault,
    reporter: &mut dyn Reporter,
) -> SelectionSet<K> {
    let mut set = SelectionSet::none_selected();
    let mut any_valid = false;

    let _state = raw_tokens
        .iter()
        .fold(ResolveState::Accumulating, |state, raw| match state {
            // A sentinel is absolute: everything after it is a no-op.
            ResolveState::LockedAll | ResolveState::LockedNone => state,
            ResolveState::Accumulating => match classify::<K>(raw, sentinels) {
                ResolutionToken::All => {
                    set.set_all(true);
                    any_valid = true;
                    ResolveState::LockedAll
                }
                ResolutionToken::None => {
                    set.set_all(false);
                    any_valid = true;
                    ResolveState::LockedNone
                }
                ResolutionToken::Member(member) => {
                    set.select(member);
                    any_valid = true;
                    ResolveState::Accumulating
                }
                ResolutionToken::Unrecognized(token) => {
                    reporter.warning(&format!(
                        "Ignoring unknown {} '{}'. Valid options are {}.",
                        K::AXIS,
                        token,
                        valid_options::<K>(sentinels)
                    ));
                    ResolveState::Accumulating
                }
            },
        });

    if !any_valid {
        let fallback = match default {
            AxisDefault::AllOn => ALL_TOKEN,
            AxisDefault::AllOff => NONE_TOKEN,
        };
        reporter.warning(&format!(
            "No valid {} supplied. Using default argument: {}",
            K::AXIS,
            fallback
        ));
        set.set_all(default == AxisDefault::AllOn);
    }

    set
}

/// The valid tokens for an axis, sentinels included
fn valid_options<K: AxisMember>(sentinels: SentinelSupport) -> String {
    let mut options: Vec<&str> = K::MEMBERS.iter().map(|member| member.token()).collect();
    options.push(ALL_TOKEN);
    if sentinels == SentinelSupport::AllAndNone {
        options.push(NONE_TOKEN);
    }
    options.join(", ")
}
