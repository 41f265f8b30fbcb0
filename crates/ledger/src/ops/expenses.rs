use tokio_util::sync::CancellationToken;

use crate::{
    Expense, ExpenseInput, LedgerError, ResultLedger,
    util::{ensure_active, normalize_input, require_non_blank},
};

use super::Ledger;

impl Ledger {
    /// Records a new expense for `owner`.
    ///
    /// The id comes from the ledger's generator; `created_at` and
    /// `updated_at` are both stamped with the same "now".
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        owner: &str,
        input: ExpenseInput,
    ) -> ResultLedger<Expense> {
        require_non_blank(owner, "owner")?;
        let fields = normalize_input(&input)?;
        ensure_active(cancel)?;

        let now = self.now();
        let expense = Expense {
            id: self.next_id(),
            owner: owner.to_string(),
            amount: fields.amount,
            category: fields.category,
            description: fields.description,
            date: fields.date,
            created_at: now,
            updated_at: now,
        };
        Ok(self.store.create(cancel, expense).await?)
    }

    /// Overwrites amount, category, description and date of an expense.
    ///
    /// Existence is checked before ownership: a foreign id yields
    /// [`LedgerError::Forbidden`], an unknown one [`LedgerError::NotFound`].
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        owner: &str,
        id: &str,
        input: ExpenseInput,
    ) -> ResultLedger<Expense> {
        require_non_blank(id, "id")?;
        require_non_blank(owner, "owner")?;
        let fields = normalize_input(&input)?;
        ensure_active(cancel)?;

        let mut expense = self.owned_expense(cancel, owner, id).await?;
        expense.amount = fields.amount;
        expense.category = fields.category;
        expense.description = fields.description;
        expense.date = fields.date;
        expense.updated_at = self.now().max(expense.created_at);

        ensure_active(cancel)?;
        Ok(self.store.update(cancel, expense).await?)
    }

    /// Removes an expense, with the same existence-then-ownership checks as
    /// [`Ledger::update`].
    pub async fn delete(
        &self,
        cancel: &CancellationToken,
        owner: &str,
        id: &str,
    ) -> ResultLedger<()> {
        require_non_blank(id, "id")?;
        require_non_blank(owner, "owner")?;
        ensure_active(cancel)?;

        self.owned_expense(cancel, owner, id).await?;

        ensure_active(cancel)?;
        Ok(self.store.delete(cancel, id).await?)
    }

    async fn owned_expense(
        &self,
        cancel: &CancellationToken,
        owner: &str,
        id: &str,
    ) -> ResultLedger<Expense> {
        let expense = self.store.get_by_id(cancel, id).await?;
        if expense.owner != owner {
            return Err(LedgerError::Forbidden(format!(
                "expense \"{id}\" belongs to another user"
            )));
        }
        Ok(expense)
    }
}
