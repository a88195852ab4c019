pub mod csv_parser;
pub mod spreadsheet_parser;
