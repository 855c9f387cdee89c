//! Annotated JSON export

use super::{iso_timestamp, ExportColumns, ExportContext, ExportError};
use crate::sentiment::SentimentRecord;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ExportMetadata<'a> {
    pub coin_id: &'a str,
    pub coin_name: &'a str,
    pub time_range: &'static str,
    pub current_price: Option<f64>,
    pub export_timestamp: String,
    pub data_points: usize,
}

#[derive(Debug, Serialize)]
pub struct AnnotatedExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExportMetadata<'a>>,
    pub sentiment_data: Vec<serde_json::Value>,
}

/// One record as JSON with the excluded groups removed
fn export_point(record: &SentimentRecord, columns: &ExportColumns) -> Result<serde_json::Value, ExportError> {
    let mut point = serde_json::to_value(record)?;
    if let Some(fields) = point.as_object_mut() {
        if !columns.technical {
            fields.remove("technical_indicators");
        }
        if !columns.market {
            fields.remove("market_context");
        }
        if !columns.sources {
            fields.remove("sources");
        }
    }
    Ok(point)
}

pub fn annotate<'a>(series: &[SentimentRecord], ctx: &'a ExportContext) -> Result<AnnotatedExport<'a>, ExportError> {
    let metadata = ctx.columns.metadata.then(|| ExportMetadata {
        coin_id: &ctx.coin_id,
        coin_name: &ctx.coin_name,
        time_range: ctx.time_range.as_str(),
        current_price: ctx.current_price,
        export_timestamp: iso_timestamp(&ctx.exported_at),
        data_points: series.len(),
    });

    let sentiment_data = series
        .iter()
        .map(|record| export_point(record, &ctx.columns))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnnotatedExport {
        metadata,
        sentiment_data,
    })
}

pub fn to_annotated_json(series: &[SentimentRecord], ctx: &ExportContext) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(&annotate(series, ctx)?)?)
}
