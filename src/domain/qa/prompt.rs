//! Prompt text sent to the reasoning engine.

use crate::domain::dataset::{DataSummary, YearRange};
use crate::domain::query::ExecutionResults;

/// How many states, crops and subdivisions the context block lists.
pub const CONTEXT_SAMPLE_LIMITS: (usize, usize, usize) = (10, 15, 10);

const DIRECTIVE_FORMAT: &str = r#"{
  "requires_data": true,
  "data_requests": [
    {
      "type": "crop_production",
      "filters": {"state": "State_Name", "year_start": 2000, "year_end": 2010, "crop": "Crop_Name"}
    },
    {
      "type": "rainfall",
      "filters": {"state": "State_Name", "year_start": 2000, "year_end": 2010}
    }
  ]
}"#;

fn years(range: Option<YearRange>) -> String {
    match range {
        Some(YearRange(start, end)) => format!(" ({}-{})", start, end),
        None => String::new(),
    }
}

fn sample(values: &[String], limit: usize) -> String {
    values
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// First turn: dataset context, directive format and the user's question.
pub fn context_prompt(summary: &DataSummary, question: &str) -> String {
    let (state_limit, crop_limit, subdivision_limit) = CONTEXT_SAMPLE_LIMITS;
    let mut prompt = String::from(
        "You are an intelligent Q&A assistant for Indian agricultural and climate data.\n\n\
         You have access to the following datasets:\n",
    );

    match &summary.crop_production {
        Some(crop) => prompt.push_str(&format!(
            "\n1. **Crop Production Data**{}:\n   \
             - States: {} states\n   \
             - Crops: {} different crops\n   \
             - Columns: {}\n   \
             - Sample states: {}\n   \
             - Sample crops: {}\n",
            years(crop.year_range),
            crop.states.len(),
            crop.crops.len(),
            crop.columns.join(", "),
            sample(&crop.states, state_limit),
            sample(&crop.crops, crop_limit),
        )),
        None => prompt.push_str("\n1. **Crop Production Data**: not available\n"),
    }

    match &summary.rainfall {
        Some(rain) => prompt.push_str(&format!(
            "\n2. **Rainfall Data**{}:\n   \
             - Subdivisions/States: {} regions\n   \
             - Columns: {}\n   \
             - Sample subdivisions: {}\n",
            years(rain.year_range),
            rain.subdivisions.len(),
            rain.columns.join(", "),
            sample(&rain.subdivisions, subdivision_limit),
        )),
        None => prompt.push_str("\n2. **Rainfall Data**: not available\n"),
    }

    prompt.push_str(
        "\nYour task:\n\
         1. Understand the user's question\n\
         2. Determine what data analysis is needed\n\
         3. I will execute the analysis and provide you with results\n\
         4. You synthesize a comprehensive answer with proper source citations\n\n\
         When you need data, respond in this JSON format:\n",
    );
    prompt.push_str(DIRECTIVE_FORMAT);
    prompt.push_str(
        "\n\nAfter receiving data, provide a natural language answer that:\n\
         - Answers the question clearly\n\
         - Cites specific data sources\n\
         - Highlights key insights\n\
         - Mentions data limitations if any\n",
    );
    prompt.push_str(&format!("\n\nUser Question: {}", question));
    prompt
}

/// Second turn: the executed results and the instruction to answer in prose.
pub fn data_prompt(results: &ExecutionResults) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(results)?;
    Ok(format!(
        "Here is the data you requested:\n\n{}\n\n\
         Please provide a comprehensive answer to the original question with proper citations. \
         Do not use JSON format in your response - provide a natural language answer.",
        data
    ))
}
