use std::collections::BTreeSet;

use serde_json::Value;

use ssm_config::Export;

pub const STATE_KEY: &str = "state";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterDecision {
	Export,
	ExcludedOwner,
	MissingState,
	/// `state` is present but is not the target string. Non-string values always land here.
	StateMismatch,
}
impl FilterDecision {
	pub fn is_export(self) -> bool {
		self == Self::Export
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Export => "export",
			Self::ExcludedOwner => "excluded_owner",
			Self::MissingState => "missing_state",
			Self::StateMismatch => "state_mismatch",
		}
	}
}

/// Selects maps whose document carries the target `state` and whose owner is not excluded.
#[derive(Clone, Debug)]
pub struct StateFilter {
	state: String,
	excluded_owners: BTreeSet<i64>,
}
impl StateFilter {
	pub fn new<I>(state: impl Into<String>, excluded_owners: I) -> Self
	where
		I: IntoIterator<Item = i64>,
	{
		Self { state: state.into(), excluded_owners: excluded_owners.into_iter().collect() }
	}

	pub fn from_config(cfg: &Export) -> Self {
		Self::new(cfg.state.clone(), cfg.excluded_owners.iter().copied())
	}

	pub fn state(&self) -> &str {
		&self.state
	}

	pub fn is_excluded(&self, owner: i64) -> bool {
		self.excluded_owners.contains(&owner)
	}

	pub fn evaluate(&self, document: &Value, owner: i64) -> FilterDecision {
		let Some(state) = document.get(STATE_KEY) else {
			return FilterDecision::MissingState;
		};

		if state.as_str() != Some(self.state.as_str()) {
			return FilterDecision::StateMismatch;
		}
		if self.is_excluded(owner) {
			return FilterDecision::ExcludedOwner;
		}

		FilterDecision::Export
	}

	pub fn qualifies(&self, document: &Value, owner: i64) -> bool {
		self.evaluate(document, owner).is_export()
	}
}
