//! Budget transforms
//!
//! Bulk operations offered from a cell's context menu: copying values across
//! months, rolling unspent budget forward, and replacing budget values with
//! actual totals. Every change is made through
//! [`CategoryTree::set_month_value`], so roll-ups and change flags follow
//! automatically.

use std::fmt;
use std::str::FromStr;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, CategoryKind, Column, Money, Month};
use crate::sources::{ActualTotals, ActualsSource};
use crate::tree::{CategoryTree, ChangeSink};

/// A bulk edit of one row, driven by the selected column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// This month takes the previous month's value
    ApplyPreviousPeriod,
    /// Every later month takes this month's value
    CopyToEndOfYear,
    /// Every other month takes this month's value
    CopyToEntireYear,
    /// The previous month becomes its actual total; the unspent remainder
    /// moves into this month
    RolloverPriorMonth,
    /// Every earlier month becomes its actual total; the year-to-date
    /// remainder lands in this month
    RolloverAllPriorMonths,
    /// This month becomes its actual total
    SetToActualSpend,
    /// This month becomes the previous month's raw actual total
    SetToPriorMonthActualSpend,
    /// The year total is spread evenly over the twelve months
    DistributeTotal,
    /// Every month becomes its actual total
    SetAllToActuals,
}

impl Transform {
    pub const ALL: [Transform; 9] = [
        Transform::ApplyPreviousPeriod,
        Transform::CopyToEndOfYear,
        Transform::CopyToEntireYear,
        Transform::RolloverPriorMonth,
        Transform::RolloverAllPriorMonths,
        Transform::SetToActualSpend,
        Transform::SetToPriorMonthActualSpend,
        Transform::DistributeTotal,
        Transform::SetAllToActuals,
    ];

    /// Command-line name
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApplyPreviousPeriod => "previous",
            Self::CopyToEndOfYear => "copy-to-end",
            Self::CopyToEntireYear => "copy-to-year",
            Self::RolloverPriorMonth => "rollover",
            Self::RolloverAllPriorMonths => "rollover-all",
            Self::SetToActualSpend => "actual",
            Self::SetToPriorMonthActualSpend => "prior-actual",
            Self::DistributeTotal => "distribute",
            Self::SetAllToActuals => "all-actuals",
        }
    }

    /// Menu label
    pub fn description(&self) -> &'static str {
        match self {
            Self::ApplyPreviousPeriod => "Apply the previous month's budget",
            Self::CopyToEndOfYear => "Copy this budget to the end of the year",
            Self::CopyToEntireYear => "Copy this budget to the entire year",
            Self::RolloverPriorMonth => "Rollover balance from prior month",
            Self::RolloverAllPriorMonths => "Rollover balance from all prior months",
            Self::SetToActualSpend => "Set budget equal to actual spending for the month",
            Self::SetToPriorMonthActualSpend => {
                "Set budget equal to actual spending from the previous month"
            }
            Self::DistributeTotal => "Distribute the total across all months",
            Self::SetAllToActuals => "Set all months to actual spending",
        }
    }

    /// Whether the transform is offered for a cell in `column`.
    ///
    /// Rollover of all prior months stays available in January, where it
    /// leaves the value as it is.
    pub fn is_available(&self, column: Column) -> bool {
        match column {
            Column::Total => matches!(self, Self::DistributeTotal | Self::SetAllToActuals),
            Column::Month(month) => match self {
                Self::ApplyPreviousPeriod
                | Self::RolloverPriorMonth
                | Self::SetToPriorMonthActualSpend => month > Month::JANUARY,
                Self::CopyToEndOfYear => month < Month::DECEMBER,
                Self::CopyToEntireYear | Self::RolloverAllPriorMonths | Self::SetToActualSpend => {
                    true
                }
                Self::DistributeTotal | Self::SetAllToActuals => false,
            },
        }
    }

    /// Transforms offered for `column`, in menu order
    pub fn available_for(column: Column) -> Vec<Transform> {
        Self::ALL
            .into_iter()
            .filter(|t| t.is_available(column))
            .collect()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Transform {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|t| t.name()).collect();
                BudgetError::Validation(format!(
                    "unknown transform '{}' (expected one of: {})",
                    s.trim(),
                    names.join(", ")
                ))
            })
    }
}

/// Runs [`Transform`]s against a tree for one budget year
pub struct TransformEngine<'a> {
    actuals: &'a dyn ActualsSource,
    year: i32,
}

impl<'a> TransformEngine<'a> {
    pub fn new(actuals: &'a dyn ActualsSource, year: i32) -> Self {
        Self { actuals, year }
    }

    /// Apply `transform` to `row` as if chosen from the cell at `column`.
    ///
    /// Returns the number of cells whose value changed. Roll-up rows and
    /// transforms not offered for `column` are rejected before anything is
    /// modified.
    pub fn apply(
        &self,
        tree: &mut CategoryTree,
        row: usize,
        column: Column,
        transform: Transform,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<usize> {
        let assignments = self.plan(tree, row, column, transform)?;

        let mut changed = 0;
        for (month, value) in assignments {
            if tree.set_month_value(row, month, value, sink)? {
                changed += 1;
            }
        }

        tracing::debug!(row, %column, %transform, changed, "transform applied");
        Ok(changed)
    }

    /// Work out the new month values without touching the tree
    pub fn plan(
        &self,
        tree: &CategoryTree,
        row: usize,
        column: Column,
        transform: Transform,
    ) -> BudgetResult<Vec<(Month, Money)>> {
        let node = tree.node(row)?;
        let category = match node.category_id() {
            Some(id) if !node.is_aggregate => id,
            _ => {
                return Err(BudgetError::NotEditable {
                    row,
                    name: node.name.clone(),
                })
            }
        };
        if !transform.is_available(column) {
            return Err(BudgetError::InvalidColumn(format!(
                "'{}' is not available in the {} column",
                transform, column
            )));
        }

        let kind = node.kind;
        let value = |m: Month| node.month_value(m);

        let plan = match (transform, column) {
            (Transform::DistributeTotal, _) => {
                let (head, december) = node.year_total().split_twelve();
                Month::all()
                    .zip(head.into_iter().chain(std::iter::once(december)))
                    .collect()
            }
            (Transform::SetAllToActuals, _) => {
                let actuals = self.totals(category, Month::JANUARY, 12)?;
                Month::all()
                    .map(|m| (m, budget_from_actual(kind, actuals.get(m))))
                    .collect()
            }
            (_, Column::Month(month)) => self.plan_month(category, kind, month, transform, value)?,
            (_, Column::Total) => Vec::new(),
        };
        Ok(plan)
    }

    fn plan_month(
        &self,
        category: CategoryId,
        kind: CategoryKind,
        month: Month,
        transform: Transform,
        value: impl Fn(Month) -> Money,
    ) -> BudgetResult<Vec<(Month, Money)>> {
        let current = value(month);

        let plan = match transform {
            Transform::ApplyPreviousPeriod => vec![(month, value(previous(month)?))],
            Transform::CopyToEndOfYear => month
                .through_year_end()
                .skip(1)
                .map(|m| (m, current))
                .collect(),
            Transform::CopyToEntireYear => Month::all()
                .filter(|&m| m != month)
                .map(|m| (m, current))
                .collect(),
            Transform::RolloverPriorMonth => {
                let prior = previous(month)?;
                let actual = self.totals(category, prior, 2)?.get(prior);
                let total = value(prior) + current;
                let spent = budget_from_actual(kind, actual);
                vec![(prior, spent), (month, total - spent)]
            }
            Transform::RolloverAllPriorMonths => {
                let actuals = self.totals(category, Month::JANUARY, month.number())?;
                let total: Money = Month::JANUARY
                    .through_year_end()
                    .take(month.number() as usize)
                    .map(&value)
                    .sum();
                let mut spending = Money::zero();
                let mut plan: Vec<_> = month
                    .before()
                    .map(|m| {
                        let spent = budget_from_actual(kind, actuals.get(m));
                        spending += spent;
                        (m, spent)
                    })
                    .collect();
                plan.push((month, total - spending));
                plan
            }
            Transform::SetToActualSpend => {
                let actual = self.totals(category, month, 1)?.get(month);
                vec![(month, budget_from_actual(kind, actual))]
            }
            Transform::SetToPriorMonthActualSpend => {
                // The raw total is used for income rows too
                let prior = previous(month)?;
                vec![(month, self.totals(category, prior, 1)?.get(prior))]
            }
            Transform::DistributeTotal | Transform::SetAllToActuals => Vec::new(),
        };
        Ok(plan)
    }

    fn totals(&self, category: CategoryId, start: Month, count: u8) -> BudgetResult<ActualTotals> {
        self.actuals.totals_for(category, self.year, start, count)
    }
}

/// Income budgets carry the opposite sign to raw actual totals
fn budget_from_actual(kind: CategoryKind, actual: Money) -> Money {
    if kind.flips_actuals() {
        -actual
    } else {
        actual
    }
}

fn previous(month: Month) -> BudgetResult<Month> {
    month
        .prev()
        .ok_or_else(|| BudgetError::InvalidColumn(format!("{} has no previous month", month)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::*;
    use crate::tree::{ChangeLog, NullSink, ROOT_ROW};
    use std::collections::HashMap;

    #[derive(Default)]
    struct FixedActuals(HashMap<(CategoryId, Month), Money>);

    impl FixedActuals {
        fn with(mut self, category: CategoryId, month: u8, units: i64) -> Self {
            self.0.insert((category, m(month)), money(units));
            self
        }
    }

    impl ActualsSource for FixedActuals {
        fn totals_for(
            &self,
            category: CategoryId,
            _year: i32,
            start: Month,
            count: u8,
        ) -> BudgetResult<ActualTotals> {
            let values = start
                .through_year_end()
                .take(count as usize)
                .map(|m| self.0.get(&(category, m)).copied().unwrap_or_default())
                .collect();
            Ok(ActualTotals::new(start, values))
        }
    }

    fn id(tree: &CategoryTree, row: usize) -> CategoryId {
        tree.node(row).unwrap().category_id().unwrap()
    }

    fn months(tree: &CategoryTree, row: usize) -> Vec<i64> {
        tree.node(row)
            .unwrap()
            .months()
            .iter()
            .map(|v| v.minor_units())
            .collect()
    }

    fn run(
        tree: &mut CategoryTree,
        actuals: &FixedActuals,
        row: usize,
        column: Column,
        transform: Transform,
    ) -> BudgetResult<usize> {
        TransformEngine::new(actuals, 2024).apply(tree, row, column, transform, &mut NullSink)
    }

    #[test]
    fn test_distribute_total() {
        let mut tree = sample_tree();
        fill(&mut tree, GROCERIES, &[1000]);

        run(
            &mut tree,
            &FixedActuals::default(),
            GROCERIES,
            Column::Total,
            Transform::DistributeTotal,
        )
        .unwrap();

        let values = months(&tree, GROCERIES);
        assert_eq!(&values[..11], &[83; 11]);
        assert_eq!(values[11], 87);
        assert_eq!(tree.node(GROCERIES).unwrap().year_total(), money(1000));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_distribute_negative_total_rounds_down() {
        let mut tree = sample_tree();
        fill(&mut tree, SALARY, &[-13]);

        run(
            &mut tree,
            &FixedActuals::default(),
            SALARY,
            Column::Total,
            Transform::DistributeTotal,
        )
        .unwrap();

        let values = months(&tree, SALARY);
        assert_eq!(&values[..11], &[-2; 11]);
        assert_eq!(values[11], 9);
        assert_eq!(values.iter().sum::<i64>(), -13);
    }

    #[test]
    fn test_copy_to_end_of_year() {
        let mut tree = sample_tree();
        fill(&mut tree, RENT, &[10, 20, 30, 40]);

        let changed = run(
            &mut tree,
            &FixedActuals::default(),
            RENT,
            Column::Month(m(2)),
            Transform::CopyToEndOfYear,
        )
        .unwrap();

        assert_eq!(changed, 10);
        assert_eq!(months(&tree, RENT), vec![10, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_copy_to_entire_year_and_previous() {
        let mut tree = sample_tree();
        fill(&mut tree, UTILITIES, &[0, 0, 75]);

        run(
            &mut tree,
            &FixedActuals::default(),
            UTILITIES,
            Column::Month(m(3)),
            Transform::CopyToEntireYear,
        )
        .unwrap();
        assert_eq!(months(&tree, UTILITIES), vec![75; 12]);

        tree.set_month_value(UTILITIES, m(6), money(90), &mut NullSink)
            .unwrap();
        run(
            &mut tree,
            &FixedActuals::default(),
            UTILITIES,
            Column::Month(m(7)),
            Transform::ApplyPreviousPeriod,
        )
        .unwrap();
        assert_eq!(tree.node(UTILITIES).unwrap().month_value(m(7)), money(90));
        assert_eq!(tree.node(HOUSING).unwrap().year_total(), money(75 * 10 + 180));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_rollover_prior_preserves_two_month_total() {
        let mut tree = sample_tree();
        fill(&mut tree, GROCERIES, &[0, 0, 0, 100, 50]);
        let actuals = FixedActuals::default().with(id(&tree, GROCERIES), 4, 80);

        run(
            &mut tree,
            &actuals,
            GROCERIES,
            Column::Month(m(5)),
            Transform::RolloverPriorMonth,
        )
        .unwrap();

        let node = tree.node(GROCERIES).unwrap();
        assert_eq!(node.month_value(m(4)), money(80));
        assert_eq!(node.month_value(m(5)), money(70));
        assert_eq!(node.year_total(), money(150));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_rollover_prior_income_flips_actual() {
        let mut tree = sample_tree();
        fill(&mut tree, SALARY, &[1000, 1000]);
        // Income received shows up as negative spending
        let actuals = FixedActuals::default().with(id(&tree, SALARY), 1, -1200);

        run(
            &mut tree,
            &actuals,
            SALARY,
            Column::Month(m(2)),
            Transform::RolloverPriorMonth,
        )
        .unwrap();

        assert_eq!(tree.node(SALARY).unwrap().month_value(m(1)), money(1200));
        assert_eq!(tree.node(SALARY).unwrap().month_value(m(2)), money(800));
    }

    #[test]
    fn test_rollover_all_prior_months() {
        let mut tree = sample_tree();
        fill(&mut tree, RENT, &[100, 100, 100, 100]);
        let rent = id(&tree, RENT);
        let actuals = FixedActuals::default()
            .with(rent, 1, 90)
            .with(rent, 2, 120)
            .with(rent, 3, 60)
            .with(rent, 4, 500);

        run(
            &mut tree,
            &actuals,
            RENT,
            Column::Month(m(4)),
            Transform::RolloverAllPriorMonths,
        )
        .unwrap();

        // 400 budgeted through April, 270 spent before April
        assert_eq!(&months(&tree, RENT)[..5], &[90, 120, 60, 130, 0]);
        assert_eq!(tree.node(HOUSING).unwrap().year_total(), money(400));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_set_to_actual_spend() {
        let mut tree = sample_tree();
        let actuals = FixedActuals::default()
            .with(id(&tree, GROCERIES), 3, 45)
            .with(id(&tree, INTEREST), 3, -7);

        run(
            &mut tree,
            &actuals,
            GROCERIES,
            Column::Month(m(3)),
            Transform::SetToActualSpend,
        )
        .unwrap();
        run(
            &mut tree,
            &actuals,
            INTEREST,
            Column::Month(m(3)),
            Transform::SetToActualSpend,
        )
        .unwrap();

        assert_eq!(tree.node(GROCERIES).unwrap().month_value(m(3)), money(45));
        assert_eq!(tree.node(INTEREST).unwrap().month_value(m(3)), money(7));
        assert_eq!(tree.node(ROOT_ROW).unwrap().month_value(m(3)), money(-38));
    }

    #[test]
    fn test_prior_month_actual_spend_keeps_raw_sign() {
        let mut tree = sample_tree();
        let salary = id(&tree, SALARY);
        let rent = id(&tree, RENT);
        let actuals = FixedActuals::default()
            .with(salary, 5, -3000)
            .with(rent, 5, 1500);

        run(
            &mut tree,
            &actuals,
            SALARY,
            Column::Month(m(6)),
            Transform::SetToPriorMonthActualSpend,
        )
        .unwrap();
        run(
            &mut tree,
            &actuals,
            RENT,
            Column::Month(m(6)),
            Transform::SetToPriorMonthActualSpend,
        )
        .unwrap();

        // No sign flip for income, unlike the other actuals-based transforms
        assert_eq!(tree.node(SALARY).unwrap().month_value(m(6)), money(-3000));
        assert_eq!(tree.node(RENT).unwrap().month_value(m(6)), money(1500));
    }

    #[test]
    fn test_set_all_to_actuals() {
        let mut tree = sample_tree();
        fill(&mut tree, SALARY, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        let actuals = FixedActuals::default()
            .with(id(&tree, SALARY), 1, -500)
            .with(id(&tree, SALARY), 12, -600);

        run(
            &mut tree,
            &actuals,
            SALARY,
            Column::Total,
            Transform::SetAllToActuals,
        )
        .unwrap();

        let values = months(&tree, SALARY);
        assert_eq!(values[0], 500);
        assert_eq!(values[11], 600);
        assert!(values[1..11].iter().all(|v| *v == 0));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_aggregate_row_is_left_untouched() {
        let mut tree = sample_tree();
        fill(&mut tree, RENT, &[100, 200]);
        let before = tree.snapshot();
        let mut log = ChangeLog::new();

        for row in [ROOT_ROW, INCOME, EXPENSES, HOUSING] {
            for transform in Transform::ALL {
                for column in [Column::Month(m(6)), Column::Total] {
                    let result = TransformEngine::new(&FixedActuals::default(), 2024).apply(
                        &mut tree, row, column, transform, &mut log,
                    );
                    assert!(result.unwrap_err().is_not_editable());
                }
            }
        }

        let after = tree.snapshot();
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.months, b.months);
        }
        assert!(log.is_empty());
    }

    #[test]
    fn test_unavailable_column_is_rejected() {
        let mut tree = sample_tree();
        let actuals = FixedActuals::default();

        let err = run(
            &mut tree,
            &actuals,
            RENT,
            Column::Month(Month::JANUARY),
            Transform::ApplyPreviousPeriod,
        )
        .unwrap_err();
        assert!(matches!(err, BudgetError::InvalidColumn(_)));

        let err = run(&mut tree, &actuals, RENT, Column::Total, Transform::CopyToEntireYear)
            .unwrap_err();
        assert!(matches!(err, BudgetError::InvalidColumn(_)));
        assert!(!tree.has_changes());
    }

    #[test]
    fn test_menu_gating() {
        let jan = Column::Month(Month::JANUARY);
        let dec = Column::Month(Month::DECEMBER);

        assert!(!Transform::ApplyPreviousPeriod.is_available(jan));
        assert!(!Transform::RolloverPriorMonth.is_available(jan));
        assert!(!Transform::SetToPriorMonthActualSpend.is_available(jan));
        assert!(Transform::RolloverAllPriorMonths.is_available(jan));
        assert!(Transform::CopyToEndOfYear.is_available(jan));
        assert!(!Transform::CopyToEndOfYear.is_available(dec));
        assert!(Transform::ApplyPreviousPeriod.is_available(dec));
        assert_eq!(
            Transform::available_for(Column::Total),
            vec![Transform::DistributeTotal, Transform::SetAllToActuals]
        );
        assert!(!Transform::DistributeTotal.is_available(Column::Month(m(6))));
    }

    #[test]
    fn test_transform_names() {
        for transform in Transform::ALL {
            assert_eq!(transform.name().parse::<Transform>().unwrap(), transform);
        }
        assert!("bogus".parse::<Transform>().is_err());
    }
}
