//! Input row types: instruments, monthly prices and financial reports.

use chrono::Datelike;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// Integer identifier of an instrument, the join key across every table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct InstrumentId(pub i64);

/// Returns the first day of the month containing `date`.
#[must_use]
pub fn month_start(date: Date) -> Date {
    Date::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// One monthly price bar for an instrument.
///
/// Unique by `(instrument, date)`; `date` is a month start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// Month-start date of the bar.
    pub date: Date,
    /// First traded price of the month.
    pub open: Option<f64>,
    /// Highest price of the month.
    pub high: Option<f64>,
    /// Lowest price of the month.
    pub low: Option<f64>,
    /// Last traded price of the month.
    pub close: Option<f64>,
    /// Total traded volume of the month.
    pub volume: Option<f64>,
}

impl PriceObservation {
    /// Creates a bar carrying only a close price.
    #[must_use]
    pub const fn new(instrument: InstrumentId, date: Date, close: Option<f64>) -> Self {
        Self {
            instrument,
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}

macro_rules! line_items {
    ($($field:ident => $doc:literal),+ $(,)?) => {
        /// Numeric line items of a single financial report. Every item is nullable.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct LineItems {
            $(
                #[doc = $doc]
                pub $field: Option<f64>,
            )+
        }

        impl LineItems {
            /// Column names of every numeric line item, in table order.
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Looks up a line item by its column name.
            #[must_use]
            pub fn get(&self, column: &str) -> Option<f64> {
                match column {
                    $(stringify!($field) => self.$field,)+
                    _ => None,
                }
            }

            /// Mutable slot of a line item by its column name.
            pub fn slot_mut(&mut self, column: &str) -> Option<&mut Option<f64>> {
                match column {
                    $(stringify!($field) => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

line_items! {
    revenues => "Revenues for the period.",
    gross_income => "Gross income for the period.",
    operating_income => "Operating income for the period.",
    profit_before_tax => "Profit before tax.",
    profit_to_equity_holders => "Profit attributable to equity holders.",
    earnings_per_share => "Earnings per share.",
    number_of_shares => "Shares outstanding.",
    dividend => "Dividend per share.",
    intangible_assets => "Intangible assets.",
    tangible_assets => "Tangible assets.",
    financial_assets => "Financial assets.",
    non_current_assets => "Non-current assets.",
    cash_and_equivalents => "Cash and cash equivalents.",
    current_assets => "Current assets.",
    total_assets => "Total assets.",
    total_equity => "Total equity.",
    non_current_liabilities => "Non-current liabilities.",
    current_liabilities => "Current liabilities.",
    total_liabilities_and_equity => "Total liabilities and equity.",
    net_debt => "Net debt.",
    cash_flow_from_operating_activities => "Operating cash flow.",
    cash_flow_from_investing_activities => "Investing cash flow.",
    cash_flow_from_financing_activities => "Financing cash flow.",
    cash_flow_for_the_year => "Net cash flow for the year.",
    free_cash_flow => "Free cash flow.",
    stock_price_average => "Average share price over the period.",
    stock_price_high => "Highest share price over the period.",
    stock_price_low => "Lowest share price over the period.",
    currency_ratio => "Conversion ratio to the reporting currency.",
    net_sales => "Net sales.",
}

/// One quarterly or annual financial report of an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportObservation {
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// First day covered by the report; the join date against prices.
    pub report_start_date: Date,
    /// Last day covered by the report.
    pub report_end_date: Date,
    /// Publication date.
    pub report_date: Option<Date>,
    /// Fiscal year.
    pub year: Option<i32>,
    /// Fiscal period within the year.
    pub period: Option<i32>,
    /// Whether the fiscal year differs from the calendar year.
    pub broken_fiscal_year: Option<bool>,
    /// Reporting currency.
    pub currency: Option<String>,
    /// Numeric line items.
    pub items: LineItems,
}

impl ReportObservation {
    /// Creates a report with empty line items.
    #[must_use]
    pub fn new(instrument: InstrumentId, report_start_date: Date, report_end_date: Date) -> Self {
        Self {
            instrument,
            report_start_date,
            report_end_date,
            report_date: None,
            year: None,
            period: None,
            broken_fiscal_year: None,
            currency: None,
            items: LineItems::default(),
        }
    }
}
