//! Monthly sales plans and their Excel export.
//!
//! Plans carry per-format targets split into new and returning buyers. The list endpoint is
//! loosely shaped: it may answer with `{items}` or a bare array, and older plans may have `pdf` or
//! `book` blocks missing or `null`. [`ApiClient::plans`] normalizes both so callers always see
//! zeroed blocks instead of absent ones.

// self
use crate::{
	_prelude::*,
	api::{self, ListShape},
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

/// PDF target block of a plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfTargets {
	/// Target for new buyers.
	#[serde(default)]
	pub new_pdf_total: u64,
	/// Target for returning buyers.
	#[serde(default)]
	pub old_pdf_total: u64,
	/// Combined target.
	#[serde(default)]
	pub pdf_total: u64,
}
impl PdfTargets {
	/// Builds a block whose total is `new + old`, saturating at `u64::MAX`.
	pub fn new(new: u64, old: u64) -> Self {
		Self { new_pdf_total: new, old_pdf_total: old, pdf_total: new.saturating_add(old) }
	}
}

/// Book target block of a plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTargets {
	/// Target for new buyers.
	#[serde(default)]
	pub new_book_total: u64,
	/// Target for returning buyers.
	#[serde(default)]
	pub old_book_total: u64,
	/// Combined target.
	#[serde(default)]
	pub book_total: u64,
}
impl BookTargets {
	/// Builds a block whose total is `new + old`, saturating at `u64::MAX`.
	pub fn new(new: u64, old: u64) -> Self {
		Self { new_book_total: new, old_book_total: old, book_total: new.saturating_add(old) }
	}
}

/// Plan as returned by `GET /plans` and `POST /plans`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
	/// Record id.
	pub id: i64,
	/// Plan month (`YYYY-MM`).
	#[serde(default)]
	pub month: Option<String>,
	/// Expected number of leads.
	#[serde(default)]
	pub total_lead: Option<u64>,
	/// PDF targets; zeroed when the backend omits them.
	#[serde(default, deserialize_with = "api::null_as_default")]
	pub pdf: PdfTargets,
	/// Book targets; zeroed when the backend omits them.
	#[serde(default, deserialize_with = "api::null_as_default")]
	pub book: BookTargets,
}

/// Body of `POST /plans` and `PATCH /plans/{id}`; unset fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
	/// Plan month (`YYYY-MM`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub month: Option<String>,
	/// Expected number of leads.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_lead: Option<u64>,
	/// PDF targets.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pdf: Option<PdfTargets>,
	/// Book targets.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub book: Option<BookTargets>,
}
impl PlanInput {
	/// Starts a plan for `month` expecting `total_lead` leads.
	pub fn new(month: impl Into<String>, total_lead: u64) -> Self {
		Self { month: Some(month.into()), total_lead: Some(total_lead), ..Default::default() }
	}

	/// Sets PDF targets; the total is derived.
	pub fn pdf(mut self, new: u64, old: u64) -> Self {
		self.pdf = Some(PdfTargets::new(new, old));

		self
	}

	/// Sets book targets; the total is derived.
	pub fn book(mut self, new: u64, old: u64) -> Self {
		self.book = Some(BookTargets::new(new, old));

		self
	}
}

/// New/returning/total split used throughout [`PlanDetail`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Split<N> {
	/// New buyers.
	pub new: N,
	/// Returning buyers.
	pub old: N,
	/// Both.
	pub total: N,
}

/// Overall sum block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallSum {
	/// Overall total.
	pub total: f64,
}

/// Per-format counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatCounts {
	/// PDF counts.
	pub pdf: Split<u64>,
	/// Book counts.
	pub book: Split<u64>,
}

/// Per-format sums plus the overall sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatSums {
	/// PDF sums.
	pub pdf: Split<f64>,
	/// Book sums.
	pub book: Split<f64>,
	/// Overall sum.
	pub overall: OverallSum,
}

/// Counts and sums for either the targets or the achieved facts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFigures {
	/// Unit counts.
	pub counts: FormatCounts,
	/// Money sums.
	pub sums: FormatSums,
}

/// Overall completion percentages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallPercents {
	/// Completion by unit count.
	pub count_percent: f64,
	/// Completion by money sum.
	pub sum_percent: f64,
}

/// Completion percentages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPercents {
	/// PDF completion.
	pub pdf: Split<f64>,
	/// Book completion.
	pub book: Split<f64>,
	/// Overall completion.
	pub overall: OverallPercents,
}

/// Response of `GET /plans/{id}`: targets, facts, and completion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanDetail {
	/// Record id.
	pub id: i64,
	/// Plan month.
	pub month: String,
	/// Expected number of leads.
	#[serde(default)]
	pub total_lead: u64,
	/// Targets.
	#[serde(default)]
	pub plans: PlanFigures,
	/// Achieved figures.
	#[serde(default)]
	pub facts: PlanFigures,
	/// Completion percentages.
	#[serde(default)]
	pub percents: PlanPercents,
}

/// Downloaded spreadsheet of one plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExcelExport {
	/// Suggested file name.
	pub filename: String,
	/// Raw `.xlsx` bytes.
	pub bytes: Vec<u8>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /plans`, normalized to a list with every target block present.
	pub async fn plans(&self) -> Result<Vec<Plan>> {
		let response = self.get("/plans").await?;

		api::decode_list(&response, ListShape::WrappedOrBare)
	}

	/// `GET /plans/{id}`.
	pub async fn plan(&self, id: i64) -> Result<PlanDetail> {
		self.fetch(ApiRequest::get(format!("/plans/{id}"))).await
	}

	/// `POST /plans`.
	pub async fn create_plan(&self, plan: &PlanInput) -> Result<Plan> {
		self.fetch(ApiRequest::post("/plans").json(plan)?).await
	}

	/// `PATCH /plans/{id}`.
	pub async fn update_plan(&self, id: i64, plan: &PlanInput) -> Result<Plan> {
		self.fetch(ApiRequest::patch(format!("/plans/{id}")).json(plan)?).await
	}

	/// `DELETE /plans/{id}`.
	pub async fn delete_plan(&self, id: i64) -> Result<()> {
		self.delete(format!("/plans/{id}")).await?;

		Ok(())
	}

	/// `GET /plans/{id}/export-excel`.
	///
	/// The file name comes from `Content-Disposition`, falling back to `plan-{id}-export.xlsx`.
	pub async fn export_plan_excel(&self, id: i64) -> Result<ExcelExport> {
		let response = self.get(format!("/plans/{id}/export-excel")).await?;
		let filename =
			response.attachment_filename().unwrap_or_else(|| format!("plan-{id}-export.xlsx"));

		Ok(ExcelExport { filename, bytes: response.into_bytes() })
	}
}
