//! Dashboard figures and the sales-list summary derived from them.

// self
use crate::{_prelude::*, client::ApiClient, http::ApiHttpClient};

/// Today's activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardToday {
	/// Bot messages received today.
	pub messages_count: u64,
	/// PDF copies sold today.
	pub pdf_sales: u64,
	/// Book copies sold today.
	pub book_sales: u64,
	/// Income collected today.
	pub income_sum: f64,
}

/// Unit count paired with a money sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
	/// Units.
	pub count: u64,
	/// Money.
	pub sum: f64,
}

/// New/returning/total targets for one format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanBreakdown {
	/// New buyers.
	pub new: Tally,
	/// Returning buyers.
	pub old: Tally,
	/// Both.
	pub total: Tally,
}

/// Completion percentages for the current month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthPercents {
	/// PDF completion.
	pub pdf: f64,
	/// Book completion.
	pub book: f64,
	/// Overall completion.
	pub overall: f64,
}

/// Current month's targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthTargets {
	/// PDF targets.
	pub pdf: PlanBreakdown,
	/// Book targets.
	pub book: PlanBreakdown,
	/// Overall target.
	pub overall: Tally,
}

/// Current month's achieved figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthFacts {
	/// PDF sales.
	pub pdf: Tally,
	/// Book sales.
	pub book: Tally,
	/// All sales.
	pub overall: Tally,
}

/// Plan progress for the current month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentMonthPlan {
	/// Id of the active plan.
	pub plan_id: i64,
	/// Plan month.
	pub month: String,
	/// Completion percentages.
	pub percents: MonthPercents,
	/// Targets.
	pub plans: MonthTargets,
	/// Achieved figures.
	pub facts: MonthFacts,
}

/// Response of `GET /dashboard`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
	/// Today's activity.
	pub today: DashboardToday,
	/// Current month's plan progress; absent when no plan covers this month.
	#[serde(default)]
	pub current_month_plan: Option<CurrentMonthPlan>,
}

/// Count and amount of one format's sales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFigure {
	/// Units sold.
	pub count: u64,
	/// Amount earned; the backend does not break income down per format, so this is `0`.
	pub amount: f64,
}

/// Summary shown above the sales list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
	/// Income collected today.
	pub today_total_amount: f64,
	/// Book sales today.
	pub today_book_sales: SalesFigure,
	/// PDF sales today.
	pub today_pdf_sales: SalesFigure,
	/// Users who wrote to the bot today.
	pub today_conversations_users: u64,
}
impl From<&DashboardToday> for DashboardStats {
	fn from(today: &DashboardToday) -> Self {
		Self {
			today_total_amount: today.income_sum,
			today_book_sales: SalesFigure { count: today.book_sales, amount: 0. },
			today_pdf_sales: SalesFigure { count: today.pdf_sales, amount: 0. },
			today_conversations_users: today.messages_count,
		}
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /dashboard`.
	pub async fn dashboard(&self) -> Result<Dashboard> {
		self.get("/dashboard").await?.json()
	}

	/// Fetches the dashboard and reduces it to the sales-list summary.
	pub async fn today_stats(&self) -> Result<DashboardStats> {
		Ok(DashboardStats::from(&self.dashboard().await?.today))
	}
}
