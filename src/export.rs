//! Full dumps of the record set: a `;` separated, fully quoted CSV file and a Parquet snapshot
//! that keeps lists, dates and nulls typed.

use std::fs::{self, File};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::builder::{ListBuilder, StringBuilder};
use arrow_array::types::Date32Type;
use arrow_array::{
    ArrayRef, Date32Array, Float64Array, Int32Array, RecordBatch, StringArray,
    UInt32Array, UInt64Array,
};
use arrow_schema::{DataType, Field as ArrowField, Schema};
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use parquet::arrow::ArrowWriter;
use tracing::info;

use crate::interrupt::{run_blocking, Interrupt};
use crate::record::Review;
use crate::Result;

const CSV_DELIMITER: u8 = b';';

const COLUMNS: [&str; 26] = [
    "id",
    "date_access",
    "title",
    "category",
    "date",
    "price",
    "price_unit",
    "pages",
    "isbn",
    "publisher",
    "published_location",
    "published_year",
    "description",
    "text",
    "headings",
    "keywords",
    "word_count",
    "links",
    "dnb_link",
    "reviewer_name",
    "reviewer_gender",
    "reviewer_title",
    "reviewer_highest_title",
    "reviewer_description",
    "reviewer_location",
    "reviewer_id",
];

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Where an export is written before it is moved onto `path`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut staged = OsString::from(path.as_os_str());
    staged.push(".partial");
    PathBuf::from(staged)
}

/// Writes the CSV and Parquet exports of `reviews`.
///
/// Both files are written to their staging paths off the runtime and only moved into place
/// when neither write failed and `interrupt` has not fired, so an interrupted run leaves no
/// output behind.
pub async fn export_records(
    csv_path: &Path,
    parquet_path: &Path,
    reviews: Vec<Review>,
    interrupt: &Interrupt,
) -> Result<()> {
    let csv_staged = staging_path(csv_path);
    let parquet_staged = staging_path(parquet_path);

    let written = run_blocking(interrupt, {
        let (csv_staged, parquet_staged) = (csv_staged.clone(), parquet_staged.clone());
        move || {
            write_csv(&csv_staged, &reviews)?;
            write_parquet_snapshot(&parquet_staged, &reviews)
        }
    })
    .await
    .and_then(|()| interrupt.check());

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&csv_staged).await;
        let _ = tokio::fs::remove_file(&parquet_staged).await;
        return Err(e);
    }

    tokio::fs::rename(&csv_staged, csv_path).await?;
    tokio::fs::rename(&parquet_staged, parquet_path).await?;
    info!("Exports in place: '{}', '{}'", csv_path.display(), parquet_path.display());
    Ok(())
}

// ###################################
// ->   CSV
// ###################################
pub fn write_csv(path: &Path, reviews: &[Review]) -> Result<()> {
    create_parent(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    writer.write_record(COLUMNS)?;
    for review in reviews {
        writer.write_record(csv_row(review)?)?;
    }
    writer.flush()?;

    info!("Wrote {} records to '{}'", reviews.len(), path.display());
    Ok(())
}

fn csv_row(r: &Review) -> Result<Vec<String>> {
    fn opt<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(T::to_string).unwrap_or_default()
    }
    Ok(vec![
        r.id.to_string(),
        opt(&r.date_access),
        opt(&r.title),
        opt(&r.category),
        opt(&r.date),
        opt(&r.price),
        opt(&r.price_unit),
        opt(&r.pages),
        opt(&r.isbn),
        opt(&r.publisher),
        opt(&r.published_location),
        opt(&r.published_year),
        opt(&r.description),
        opt(&r.text),
        serde_json::to_string(&r.headings)?,
        serde_json::to_string(&r.keywords)?,
        opt(&r.word_count),
        serde_json::to_string(&r.links)?,
        opt(&r.dnb_link),
        opt(&r.reviewer_name),
        r.reviewer_gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
        serde_json::to_string(&r.reviewer_title)?,
        r.reviewer_highest_title.map(|t| t.as_str().to_string()).unwrap_or_default(),
        opt(&r.reviewer_description),
        serde_json::to_string(&r.reviewer_location)?,
        opt(&r.reviewer_id),
    ])
}

// ###################################
// ->   PARQUET
// ###################################
fn write_parquet(path: &Path, batch: RecordBatch) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn string_list() -> DataType {
    DataType::List(Arc::new(ArrowField::new("item", DataType::Utf8, true)))
}

fn review_schema() -> Schema {
    Schema::new(vec![
        ArrowField::new("id", DataType::UInt64, false),
        ArrowField::new("date_access", DataType::Date32, true),
        ArrowField::new("title", DataType::Utf8, true),
        ArrowField::new("category", DataType::Utf8, true),
        ArrowField::new("date", DataType::Date32, true),
        ArrowField::new("price", DataType::Float64, true),
        ArrowField::new("price_unit", DataType::Utf8, true),
        ArrowField::new("pages", DataType::UInt32, true),
        ArrowField::new("isbn", DataType::Utf8, true),
        ArrowField::new("publisher", DataType::Utf8, true),
        ArrowField::new("published_location", DataType::Utf8, true),
        ArrowField::new("published_year", DataType::Int32, true),
        ArrowField::new("description", DataType::Utf8, true),
        ArrowField::new("text", DataType::Utf8, true),
        ArrowField::new("headings", string_list(), true),
        ArrowField::new("keywords", string_list(), true),
        ArrowField::new("word_count", DataType::UInt64, true),
        ArrowField::new("links", string_list(), true),
        ArrowField::new("dnb_link", DataType::Utf8, true),
        ArrowField::new("reviewer_name", DataType::Utf8, true),
        ArrowField::new("reviewer_gender", DataType::Utf8, true),
        ArrowField::new("reviewer_title", string_list(), true),
        ArrowField::new("reviewer_highest_title", DataType::Utf8, true),
        ArrowField::new("reviewer_description", DataType::Utf8, true),
        ArrowField::new("reviewer_location", string_list(), true),
        ArrowField::new("reviewer_id", DataType::UInt64, true),
    ])
}

fn strings<'a>(reviews: &'a [Review], field: impl Fn(&'a Review) -> Option<&'a str>) -> ArrayRef {
    Arc::new(StringArray::from(reviews.iter().map(field).collect::<Vec<_>>()))
}

fn string_lists<'a, I, S>(reviews: &'a [Review], field: impl Fn(&'a Review) -> I) -> ArrayRef
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = ListBuilder::new(StringBuilder::new());
    for review in reviews {
        for value in field(review) {
            builder.values().append_value(value);
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn dates(reviews: &[Review], field: impl Fn(&Review) -> Option<NaiveDate>) -> ArrayRef {
    Arc::new(Date32Array::from(
        reviews
            .iter()
            .map(|r| field(r).map(Date32Type::from_naive_date))
            .collect::<Vec<_>>(),
    ))
}

pub fn write_parquet_snapshot(path: &Path, reviews: &[Review]) -> Result<()> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(reviews.iter().map(|r| r.id).collect::<Vec<_>>())),
        dates(reviews, |r| r.date_access),
        strings(reviews, |r| r.title.as_deref()),
        strings(reviews, |r| r.category.as_deref()),
        dates(reviews, |r| r.date),
        Arc::new(Float64Array::from(reviews.iter().map(|r| r.price).collect::<Vec<_>>())),
        strings(reviews, |r| r.price_unit.as_deref()),
        Arc::new(UInt32Array::from(reviews.iter().map(|r| r.pages).collect::<Vec<_>>())),
        strings(reviews, |r| r.isbn.as_deref()),
        strings(reviews, |r| r.publisher.as_deref()),
        strings(reviews, |r| r.published_location.as_deref()),
        Arc::new(Int32Array::from(
            reviews.iter().map(|r| r.published_year).collect::<Vec<_>>(),
        )),
        strings(reviews, |r| r.description.as_deref()),
        strings(reviews, |r| r.text.as_deref()),
        string_lists(reviews, |r| &r.headings),
        string_lists(reviews, |r| &r.keywords),
        Arc::new(UInt64Array::from(
            reviews
                .iter()
                .map(|r| r.word_count.map(|c| c as u64))
                .collect::<Vec<_>>(),
        )),
        string_lists(reviews, |r| &r.links),
        strings(reviews, |r| r.dnb_link.as_deref()),
        strings(reviews, |r| r.reviewer_name.as_deref()),
        strings(reviews, |r| r.reviewer_gender.map(|g| g.as_str())),
        string_lists(reviews, |r| r.reviewer_title.iter().map(|t| t.as_str())),
        strings(reviews, |r| r.reviewer_highest_title.map(|t| t.as_str())),
        strings(reviews, |r| r.reviewer_description.as_deref()),
        string_lists(reviews, |r| &r.reviewer_location),
        Arc::new(UInt64Array::from(
            reviews.iter().map(|r| r.reviewer_id).collect::<Vec<_>>(),
        )),
    ];

    let batch = RecordBatch::try_new(Arc::new(review_schema()), columns)?;
    write_parquet(path, batch)?;

    info!("Wrote {} records to '{}'", reviews.len(), path.display());
    Ok(())
}
