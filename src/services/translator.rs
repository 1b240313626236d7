use std::collections::HashMap;

use crate::domain::{
    BoardListing, ColumnRef, ItemsQuery, TranslatedQuery, TranslatedRule, TranslationMiss,
};

/// Lower-cased title to column id. On a shared title the first column wins.
pub struct ColumnIndex<'a> {
    by_title: HashMap<String, &'a str>,
    board: &'a BoardListing,
}

impl<'a> ColumnIndex<'a> {
    pub fn for_board(board: &'a BoardListing) -> Self {
        let mut by_title: HashMap<String, &'a str> = HashMap::with_capacity(board.columns.len());
        for column in &board.columns {
            let key = column.title.to_lowercase();
            if let Some(existing) = by_title.get(&key) {
                tracing::debug!(
                    board = board.name.as_str(),
                    title = column.title.as_str(),
                    kept = *existing,
                    ignored = column.id.as_str(),
                    "Duplicate column title on board"
                );
                continue;
            }
            by_title.insert(key, column.id.as_str());
        }

        Self { by_title, board }
    }

    pub fn resolve(&self, column: &ColumnRef) -> Option<&'a str> {
        match column {
            ColumnRef::Title(title) => self.by_title.get(&title.to_lowercase()).copied(),
            ColumnRef::Id(id) => self
                .board
                .columns
                .iter()
                .find(|c| c.id == *id)
                .map(|c| c.id.as_str()),
        }
    }
}

pub fn translate(
    query: &ItemsQuery,
    board: &BoardListing,
) -> Result<TranslatedQuery, TranslationMiss> {
    let index = ColumnIndex::for_board(board);

    let rules = query
        .rules
        .iter()
        .map(|rule| -> Result<TranslatedRule, TranslationMiss> {
            let column_id = index.resolve(&rule.column).ok_or_else(|| TranslationMiss {
                board: board.name.clone(),
                column: rule.column.to_string(),
            })?;
            tracing::trace!(
                board = board.name.as_str(),
                column = %rule.column,
                column_id,
                "Resolved filter column"
            );
            Ok(TranslatedRule {
                column_id: column_id.to_string(),
                compare_value: rule.compare_value.clone(),
                operator: rule.operator,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TranslatedQuery {
        rules,
        operator: query.operator,
    })
}
