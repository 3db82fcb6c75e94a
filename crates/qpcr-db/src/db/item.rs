use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use qpcr_core::ExperimentRecord;

/// Partition key attribute of the experiments table
pub const PARTITION_KEY: &str = "experimentId";

/// Map a record onto DynamoDB attributes. Numbers (`fileSize`, `ttl`) are `N`, everything
/// else is `S`; an absent description is omitted rather than stored empty.
pub fn record_to_item(record: &ExperimentRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::with_capacity(13);

    let mut s = |name: &str, value: String| {
        item.insert(name.to_string(), AttributeValue::S(value));
    };
    s(PARTITION_KEY, record.experiment_id.to_string());
    s("userId", record.user_id.clone());
    s("experimentName", record.experiment_name.clone());
    s("uploadTimestamp", record.upload_timestamp_iso());
    s("inputFileKey", record.input_file_key.clone());
    s("analysisType", record.analysis_type.as_str().to_string());
    s("housekeepingGene", record.housekeeping_gene.clone());
    s("controlSample", record.control_sample.clone());
    s("status", record.status.as_str().to_string());
    s("fileName", record.file_name.clone());
    if let Some(description) = &record.description {
        s("description", description.clone());
    }

    item.insert(
        "fileSize".to_string(),
        AttributeValue::N(record.file_size.to_string()),
    );
    item.insert("ttl".to_string(), AttributeValue::N(record.ttl.to_string()));

    item
}
