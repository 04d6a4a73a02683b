use anyhow::Result;
use comfy_table::{Cell, Table};
use reelquery::AliasTable;
use serde::Serialize;

use crate::output::{GlobalOptions, OutputManager, TableDisplay, bullet_list, create_table, placeholder};

#[derive(Debug, Serialize)]
pub struct FieldRow {
    pub field: String,
    pub shorthands: Vec<String>,
    pub facetable: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldsReport {
    pub fields: Vec<FieldRow>,
}

pub fn build_fields_report(aliases: &AliasTable) -> FieldsReport {
    let fields = aliases
        .canonical_fields()
        .into_iter()
        .map(|field| FieldRow {
            field: field.to_string(),
            shorthands: aliases.aliases_for(field).into_iter().map(str::to_string).collect(),
            facetable: aliases.is_facetable(field),
        })
        .collect();
    FieldsReport { fields }
}

impl TableDisplay for FieldsReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options, &["Field", "Shorthands", "Facet"]);
        if self.fields.is_empty() {
            table.add_row(vec![Cell::new("No fields configured")]);
            return table;
        }
        for row in &self.fields {
            let shorthands = if row.shorthands.is_empty() {
                placeholder(options)
            } else {
                bullet_list(&row.shorthands)
            };
            table.add_row(vec![
                Cell::new(&row.field),
                Cell::new(shorthands),
                Cell::new(if row.facetable { "yes" } else { "no" }),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.fields
            .iter()
            .map(|row| {
                if row.shorthands.is_empty() {
                    row.field.clone()
                } else {
                    format!("{}={}", row.field, row.shorthands.join(","))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn handle_fields(aliases: &AliasTable, output: &OutputManager) -> Result<()> {
    output.heading("Searchable fields");
    output.display(&build_fields_report(aliases))
}
