//! Schema command - print the expected snapshot input format

use clap::Args;
use rentax::core::{Booking, DepreciationRecord, FieldDoc, PortfolioSnapshot, Property, Transaction};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the snapshot document
    JsonSchema,
    /// Field descriptions for each record type
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => {
                self.print_fields();
                Ok(())
            }
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(PortfolioSnapshot);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) {
        println!("Portfolio Snapshot Format");
        println!("=========================");
        let sections: [(&str, &[FieldDoc]); 4] = [
            ("properties", Property::field_docs()),
            ("bookings", Booking::field_docs()),
            ("transactions", Transaction::field_docs()),
            ("depreciation_records", DepreciationRecord::field_docs()),
        ];
        for (section, fields) in sections {
            println!();
            println!("{}[]", section);
            for field in fields {
                let req = if field.required { "required" } else { "optional" };
                println!("  {:26} ({:8})  {}", field.name, req, field.description);
            }
        }
        println!();
        println!("Amounts may be JSON numbers or strings; strings keep exact decimals.");
    }
}
