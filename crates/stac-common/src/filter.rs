use chrono::{Duration, Months, NaiveDate};

/// Item filter as entered in the sidebar.
///
/// The session replaces it wholesale; use the `with_*` helpers to derive the
/// next value from the current one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Filter {
    pub item_id: ItemIdFilter,
    pub dates: DateFilter,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ItemIdFilter {
    pub item_id: Option<String>,
}

/// A date range. Only a range with both bounds constrains anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DateFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Filter {
    /// True when no constraint is active; such a filter matches every item.
    pub fn is_empty(&self) -> bool {
        self.item_id().is_none() && self.dates.range().is_none()
    }

    /// Trimmed, non-empty item id, if any.
    pub fn item_id(&self) -> Option<&str> {
        self.item_id
            .item_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn with_item_id(&self, item_id: impl Into<String>) -> Self {
        let item_id = item_id.into();
        Self {
            item_id: ItemIdFilter {
                item_id: (!item_id.is_empty()).then_some(item_id),
            },
            dates: self.dates,
        }
    }

    pub fn with_dates(&self, dates: DateFilter) -> Self {
        Self {
            item_id: self.item_id.clone(),
            dates,
        }
    }

    pub fn with_start(&self, start_date: Option<NaiveDate>) -> Self {
        self.with_dates(DateFilter {
            start_date,
            end_date: self.dates.end_date,
        })
    }

    pub fn with_end(&self, end_date: Option<NaiveDate>) -> Self {
        self.with_dates(DateFilter {
            start_date: self.dates.start_date,
            end_date,
        })
    }
}

impl DateFilter {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Both bounds, or nothing.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    /// Parse an `<input type="date">` value. Empty or invalid input clears the bound.
    pub fn parse_bound(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
    }
}

/// Quick ranges offered next to the date inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePreset {
    All,
    LastWeek,
    LastMonth,
    LastYear,
}

impl DatePreset {
    pub const ALL: [DatePreset; 4] = [
        DatePreset::All,
        DatePreset::LastWeek,
        DatePreset::LastMonth,
        DatePreset::LastYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::All => "All",
            DatePreset::LastWeek => "Last Week",
            DatePreset::LastMonth => "Last Month",
            DatePreset::LastYear => "Last Year",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            DatePreset::All => "all",
            DatePreset::LastWeek => "last-week",
            DatePreset::LastMonth => "last-month",
            DatePreset::LastYear => "last-year",
        }
    }

    /// Unknown values fall back to `All`.
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.value() == value)
            .unwrap_or(DatePreset::All)
    }

    /// Range ending `today`. Month and year steps clamp to the end of a
    /// shorter month.
    pub fn range(self, today: NaiveDate) -> DateFilter {
        let start = match self {
            DatePreset::All => return DateFilter::default(),
            DatePreset::LastWeek => today.checked_sub_signed(Duration::days(7)),
            DatePreset::LastMonth => today.checked_sub_months(Months::new(1)),
            DatePreset::LastYear => today.checked_sub_months(Months::new(12)),
        };
        match start {
            Some(start) => DateFilter::new(Some(start), Some(today)),
            None => DateFilter::default(),
        }
    }
}
