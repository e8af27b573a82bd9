use crate::model::debt::{DebtItem, DebtStatus};

/// One kanban column: a status and its items, in filter order
#[derive(Debug, Clone)]
pub struct Column<'a> {
    pub status: DebtStatus,
    pub items: Vec<&'a DebtItem>,
}

impl Column<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Placeholder shown for a column with no items
    pub fn empty_message(&self) -> String {
        format!("No items in {}", self.status.label().to_lowercase())
    }
}

/// The four status columns in lifecycle order
#[derive(Debug, Clone)]
pub struct Board<'a> {
    pub columns: [Column<'a>; 4],
}

impl<'a> Board<'a> {
    pub fn column(&self, status: DebtStatus) -> &Column<'a> {
        &self.columns[status.index()]
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }
}

/// Group already-filtered items by status. Within each column the input
/// order is kept; every status gets a column even when empty.
pub fn group_by_status<'a>(items: &[&'a DebtItem]) -> Board<'a> {
    let mut columns = DebtStatus::ALL.map(|status| Column {
        status,
        items: Vec::new(),
    });
    for item in items {
        columns[item.status.index()].items.push(*item);
    }
    Board { columns }
}
