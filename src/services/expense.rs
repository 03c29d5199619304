//! Expense service
//!
//! Validates new expenses, computes their shares and stores them. Listing
//! works on stored documents so that malformed records remain visible.

use chrono::Utc;

use crate::config::settings::Settings;
use crate::error::{SplitError, SplitResult};
use crate::ledger::{allocate_shares, redistribute_remainder, DateLike};
use crate::models::{
    Expense, ExpenseDocument, ExpenseId, Group, MemberId, Money, PeriodKey, SharesMap, SplitType,
};
use crate::storage::{document_period, Storage};

use super::period::PeriodService;

/// Input for a new expense
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub payer: Option<MemberId>,
    /// Members sharing the cost; empty means the whole group, or the holders
    /// of `custom_shares` for a custom split
    pub participants: Vec<MemberId>,
    pub split_type: SplitType,
    pub custom_shares: Option<SharesMap>,
    /// For a custom split, spread whatever `custom_shares` leave unallocated
    /// evenly over the participants without a share
    pub fill_remaining: bool,
    /// Defaults to today
    pub date: Option<DateLike>,
    pub category: Option<String>,
}

/// Filter for expense listings
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub period: Option<PeriodKey>,
    pub category: Option<String>,
    pub payer: Option<MemberId>,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Validate a draft against a group and build the expense
    ///
    /// Nothing is stored; see [`ExpenseService::add`].
    pub fn prepare(&self, group: &Group, draft: ExpenseDraft) -> SplitResult<Expense> {
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(SplitError::Validation(
                "Expense description is required".into(),
            ));
        }

        if !draft.amount.is_positive() {
            return Err(SplitError::InvalidAmount(format!(
                "expense total must be positive, got {}",
                draft.amount
            )));
        }

        let payer = draft
            .payer
            .ok_or_else(|| SplitError::Validation("Payer is required".into()))?;
        if !group.has_member(&payer) {
            return Err(SplitError::Validation(format!(
                "Payer '{}' is not a member of {}",
                payer, group.name
            )));
        }

        let filling = draft.fill_remaining && draft.split_type == SplitType::Custom;
        let participants = match (&draft.split_type, &draft.custom_shares) {
            _ if !draft.participants.is_empty() => draft.participants.clone(),
            (SplitType::Custom, Some(custom)) if !filling => custom.keys().cloned().collect(),
            _ => group.members.clone(),
        };
        if let Some(outsider) = participants.iter().find(|m| !group.has_member(m)) {
            return Err(SplitError::UnknownParticipant(outsider.clone()));
        }

        let custom_shares = if filling {
            let given = draft.custom_shares.unwrap_or_default();
            Some(redistribute_remainder(&given, &participants, draft.amount))
        } else {
            draft.custom_shares
        };

        let shares = allocate_shares(
            draft.amount,
            &participants,
            draft.split_type,
            custom_shares.as_ref(),
        )?;

        let zone = self.settings.zone();
        let date = draft
            .date
            .unwrap_or_else(|| DateLike::day(self.settings.today()));
        let expense_date = date.at_noon(zone)?;
        if expense_date.date_naive() > self.settings.today() {
            return Err(SplitError::Validation(
                "Cannot create expenses for future dates".into(),
            ));
        }

        let period = PeriodService::new(self.settings)
            .key_of(&DateLike::Native(expense_date))
            .key();

        let category = draft
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.settings.default_category.clone());

        Ok(Expense {
            id: ExpenseId::new(),
            group_id: group.id,
            description,
            amount: draft.amount,
            payer,
            shares,
            split_type: draft.split_type,
            expense_date,
            period,
            category,
            created_at: Utc::now(),
        })
    }

    /// Validate and store a new expense
    pub fn add(&self, group: &Group, draft: ExpenseDraft) -> SplitResult<Expense> {
        let expense = self.prepare(group, draft)?;

        self.storage
            .expenses
            .insert(ExpenseDocument::from(&expense))?;
        self.storage.expenses.save()?;

        tracing::info!(
            expense = %expense.id,
            group = %group.name,
            amount = %expense.amount,
            period = %expense.period,
            "recorded expense"
        );

        Ok(expense)
    }

    /// Get a stored expense by ID
    pub fn get(&self, id: ExpenseId) -> SplitResult<ExpenseDocument> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| SplitError::expense_not_found(id.to_string()))
    }

    /// Find a stored expense by full id or displayed short id
    pub fn find(&self, identifier: &str) -> SplitResult<Option<ExpenseDocument>> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self.storage.expenses.get(id);
        }

        Ok(self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .find(|doc| doc.id.map_or(false, |id| id.to_string() == identifier)))
    }

    /// List a group's expenses, oldest first
    pub fn list(&self, group: &Group, filter: &ExpenseFilter) -> SplitResult<Vec<ExpenseDocument>> {
        let zone = self.settings.zone();
        let category = filter.category.as_ref().map(|c| c.trim().to_lowercase());

        let mut documents: Vec<_> = match filter.period {
            Some(period) => self.storage.expenses.get_by_period(group.id, period, zone)?,
            None => self.storage.expenses.get_by_group(group.id)?,
        };

        documents.retain(|doc| {
            category
                .as_ref()
                .map_or(true, |c| doc.category.trim().to_lowercase() == *c)
                && filter
                    .payer
                    .as_ref()
                    .map_or(true, |p| doc.payer.as_ref() == Some(p))
        });

        documents.sort_by_key(|doc| {
            (
                doc.expense_date
                    .as_ref()
                    .and_then(|d| d.at_noon(zone).ok()),
                document_period(doc, zone),
            )
        });
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SplitPaths;
    use crate::services::GroupService;
    use chrono::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage, Settings::default())
    }

    fn group(storage: &Storage) -> Group {
        GroupService::new(storage)
            .create("Flat", &["A".to_string(), "B".to_string(), "C".to_string()])
            .unwrap()
    }

    fn draft(cents: i64, payer: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            description: "Dinner".to_string(),
            amount: Money::from_cents(cents),
            payer: Some(MemberId::from(payer)),
            date: Some(DateLike::iso(date)),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_equal_split() {
        let (_temp_dir, storage, settings) = setup();
        let group = group(&storage);
        let service = ExpenseService::new(&storage, &settings);

        let expense = service.add(&group, draft(10000, "A", "2025-01-15")).unwrap();

        assert_eq!(expense.shares[&MemberId::from("A")], Money::from_cents(3333));
        assert_eq!(expense.shares[&MemberId::from("C")], Money::from_cents(3334));
        assert_eq!(expense.shares_total(), expense.amount);
        assert_eq!(expense.period, PeriodKey::new(2025, 1).unwrap());
        assert_eq!(expense.category, "uncategorized");
        assert_eq!(expense.expense_date.to_rfc3339(), "2025-01-15T12:00:00+00:00");

        let stored = service.get(expense.id).unwrap();
        assert!(stored.is_well_formed());

        let short = expense.id.to_string();
        assert_eq!(service.find(&short).unwrap().unwrap().id, Some(expense.id));
        assert!(service.find("exp-00000000").unwrap().is_none());
    }

    #[test]
    fn test_custom_split_defaults_participants_to_share_holders() {
        let (_temp_dir, storage, settings) = setup();
        let group = group(&storage);
        let service = ExpenseService::new(&storage, &settings);

        let mut custom = SharesMap::new();
        custom.insert(MemberId::from("A"), Money::from_cents(700));
        custom.insert(MemberId::from("B"), Money::from_cents(300));

        let expense = service
            .add(
                &group,
                ExpenseDraft {
                    split_type: SplitType::Custom,
                    custom_shares: Some(custom),
                    ..draft(1000, "C", "2025-01-15")
                },
            )
            .unwrap();

        assert_eq!(expense.shares.len(), 2);
        assert_eq!(expense.shares[&MemberId::from("B")], Money::from_cents(300));
    }

    #[test]
    fn test_custom_split_fills_remaining_participants() {
        let (_temp_dir, storage, settings) = setup();
        let group = group(&storage);
        let service = ExpenseService::new(&storage, &settings);

        let mut custom = SharesMap::new();
        custom.insert(MemberId::from("A"), Money::from_cents(7000));

        let expense = service
            .add(
                &group,
                ExpenseDraft {
                    split_type: SplitType::Custom,
                    custom_shares: Some(custom.clone()),
                    fill_remaining: true,
                    ..draft(10000, "A", "2025-01-15")
                },
            )
            .unwrap();

        assert_eq!(expense.shares[&MemberId::from("A")], Money::from_cents(7000));
        assert_eq!(expense.shares[&MemberId::from("B")], Money::from_cents(1500));
        assert_eq!(expense.shares[&MemberId::from("C")], Money::from_cents(1500));
        assert_eq!(expense.shares_total(), expense.amount);

        // Explicit participants limit who picks up the rest
        let expense = service
            .add(
                &group,
                ExpenseDraft {
                    split_type: SplitType::Custom,
                    custom_shares: Some(custom.clone()),
                    fill_remaining: true,
                    participants: vec![MemberId::from("A"), MemberId::from("C")],
                    ..draft(10001, "B", "2025-01-16")
                },
            )
            .unwrap();
        assert_eq!(expense.shares.len(), 2);
        assert_eq!(expense.shares[&MemberId::from("C")], Money::from_cents(3001));

        // Over-allocated shares are left alone and still rejected
        custom.insert(MemberId::from("B"), Money::from_cents(4000));
        let err = service
            .add(
                &group,
                ExpenseDraft {
                    split_type: SplitType::Custom,
                    custom_shares: Some(custom),
                    fill_remaining: true,
                    ..draft(10000, "A", "2025-01-17")
                },
            )
            .unwrap_err();
        assert!(matches!(err, SplitError::ShareMismatch { .. }));
    }

    #[test]
    fn test_custom_split_mismatch_is_rejected() {
        let (_temp_dir, storage, settings) = setup();
        let group = group(&storage);
        let service = ExpenseService::new(&storage, &settings);

        let mut custom = SharesMap::new();
        custom.insert(MemberId::from("A"), Money::from_cents(500));
        custom.insert(MemberId::from("B"), Money::from_cents(400));

        let err = service
            .add(
                &group,
                ExpenseDraft {
                    split_type: SplitType::Custom,
                    custom_shares: Some(custom),
                    ..draft(1000, "A", "2025-01-15")
                },
            )
            .unwrap_err();

        assert!(matches!(
            err,
            SplitError::ShareMismatch { sum, expected }
                if sum == Money::from_cents(900) && expected == Money::from_cents(1000)
        ));
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_validation_errors() {
        let (_temp_dir, storage, settings) = setup();
        let group = group(&storage);
        let service = ExpenseService::new(&storage, &settings);

        let blank = ExpenseDraft {
            description: "  ".to_string(),
            ..draft(100, "A", "2025-01-15")
        };
        assert!(matches!(service.prepare(&group, blank), Err(SplitError::Validation(_))));

        assert!(matches!(
            service.prepare(&group, draft(0, "A", "2025-01-15")),
            Err(SplitError::InvalidAmount(_))
        ));

        assert!(matches!(
            service.prepare(&group, draft(100, "Z", "2025-01-15")),
            Err(SplitError::Validation(_))
        ));

        let outsider = ExpenseDraft {
            participants: vec![MemberId::from("A"), MemberId::from("Z")],
            ..draft(100, "A", "2025-01-15")
        };
        assert!(matches!(
            service.prepare(&group, outsider),
            Err(SplitError::UnknownParticipant(m)) if m.as_str() == "Z"
        ));

        assert!(matches!(
            service.prepare(&group, draft(100, "A", "15/01/2025")),
            Err(SplitError::UnparseableDate(_))
        ));
    }

    #[test]
    fn test_future_dates_are_rejected() {
        let (_temp_dir, storage, settings) = setup();
        let group = group(&storage);
        let service = ExpenseService::new(&storage, &settings);

        let tomorrow = settings.today() + Duration::days(1);
        let future = ExpenseDraft {
            date: Some(DateLike::day(tomorrow)),
            ..draft(100, "A", "")
        };
        let err = service.prepare(&group, future).unwrap_err();
        assert!(err.to_string().contains("future dates"));

        let today = ExpenseDraft {
            date: None,
            ..draft(100, "A", "")
        };
        let expense = service.prepare(&group, today).unwrap();
        assert_eq!(expense.period, PeriodService::new(&settings).current_period());
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage, settings) = setup();
        let group = group(&storage);
        let service = ExpenseService::new(&storage, &settings);

        service
            .add(
                &group,
                ExpenseDraft {
                    category: Some("Food".to_string()),
                    ..draft(1500, "A", "2025-01-20")
                },
            )
            .unwrap();
        service.add(&group, draft(900, "B", "2025-01-05")).unwrap();
        service.add(&group, draft(300, "A", "2025-02-01")).unwrap();

        let january = ExpenseFilter {
            period: PeriodKey::new(2025, 1),
            ..Default::default()
        };
        let listed = service.list(&group, &january).unwrap();
        let amounts: Vec<_> = listed.iter().filter_map(|d| d.amount).collect();
        assert_eq!(amounts, [Money::from_cents(900), Money::from_cents(1500)]);

        let food = ExpenseFilter {
            category: Some("food".to_string()),
            ..Default::default()
        };
        assert_eq!(service.list(&group, &food).unwrap().len(), 1);

        let paid_by_a = ExpenseFilter {
            payer: Some(MemberId::from("A")),
            ..Default::default()
        };
        assert_eq!(service.list(&group, &paid_by_a).unwrap().len(), 2);
    }
}
