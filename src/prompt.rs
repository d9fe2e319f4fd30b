//! Prompt Construction
//!
//! Merges the user's context, an encoded attachment, the four categorical
//! selections and the brand directives into one provider-agnostic payload, and
//! declares the response schema the provider must satisfy.

use crate::attachment::{EncodedAttachment, EncodedContent};
use crate::config::BrandConfig;
use crate::types::FormInputs;
use serde::Serialize;
use serde_json::{json, Value};

/// One generation request, owned by the controller for the duration of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub inputs: FormInputs,
    pub attachment: Option<EncodedAttachment>,
}

impl GenerationRequest {
    pub fn new(inputs: FormInputs, attachment: Option<EncodedAttachment>) -> Self {
        Self { inputs, attachment }
    }
}

/// Binary part carried next to the instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryPart {
    pub media_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Provider-agnostic instruction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub instructions: String,
    pub binary_part: Option<BinaryPart>,
}

impl PromptPayload {
    pub fn is_multipart(&self) -> bool {
        self.binary_part.is_some()
    }
}

/// Declared shape of the provider's response, in JSON Schema form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema(Value);

impl ResponseSchema {
    /// Object with required `title`, `post` and `hashtags` fields.
    pub fn generation_result() -> Self {
        Self(json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Short, catchy, SEO-friendly headline."
                },
                "post": {
                    "type": "string",
                    "description": "Complete post body suited to the platform, with tasteful emoji and markdown line breaks."
                },
                "hashtags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Between 3 and 5 SEO-friendly hashtags."
                }
            },
            "required": ["title", "post", "hashtags"]
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn required_fields(&self) -> Vec<&str> {
        self.0["required"]
            .as_array()
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Builds prompts in the configured brand voice.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    brand: BrandConfig,
}

impl PromptBuilder {
    pub fn new(brand: BrandConfig) -> Self {
        Self { brand }
    }

    pub fn schema(&self) -> ResponseSchema {
        ResponseSchema::generation_result()
    }

    /// Build the payload for a request. Pure and deterministic.
    pub fn build(&self, request: &GenerationRequest) -> PromptPayload {
        let inputs = &request.inputs;
        let mut context = inputs.context.clone();
        let mut binary_part = None;

        if let Some(attachment) = &request.attachment {
            match &attachment.content {
                EncodedContent::Text { content } => {
                    context.push_str(&format!(
                        "\n\n[Data from attached file {}]:\n{}",
                        attachment.file_name, content
                    ));
                }
                EncodedContent::Binary { base64 } => {
                    binary_part = Some(BinaryPart {
                        media_type: attachment.media_type.clone(),
                        data: base64.clone(),
                    });
                }
                EncodedContent::Unsupported => {}
            }
        }

        let context = if context.is_empty() {
            "None provided".to_string()
        } else {
            context
        };

        let brand = &self.brand;
        let instructions = format!(
            "You are a communications content specialist for {brand}.\n\
             Using the information below, and analysing the attached file if there is one:\n\
             - Context (entered by the user): {context}\n\
             - Goal of the post: {goal}\n\
             - Publishing platform: {platform}\n\
             - Target audience: {audience}\n\
             - Desired tone: {tone}\n\
             \n\
             Produce communication content that meets these requirements:\n\
             1. Follow the {brand} brand identity strictly: the voice is serious and responsible, yet approachable and trustworthy.\n\
             2. Title: one short, catchy headline that draws attention and is optimised for SEO.\n\
             3. Post:\n\
             \x20  - If a file is attached, analyse its content and use it as the primary source for the post.\n\
             \x20  - Keep it coherent, concise and clearly structured. Use markdown line breaks (\\n).\n\
             \x20  - Adapt the length to the chosen platform ({platform}). For example, TikTok needs brevity while a website can run longer.\n\
             \x20  - Use language suited to the audience ({audience}).\n\
             \x20  - Use icons or emoji sparingly and tastefully to make the post livelier.\n\
             4. Hashtags: suggest 3 to 5 relevant, SEO-friendly hashtags, always including the brand hashtag {hashtag}.\n\
             \n\
             Write the title, post and hashtags in {language}.\n\
             Return the result as a single JSON object.",
            brand = brand.name,
            hashtag = brand.hashtag,
            language = brand.language,
            context = context,
            goal = inputs.goal,
            platform = inputs.platform,
            audience = inputs.audience,
            tone = inputs.tone,
        );

        PromptPayload {
            instructions,
            binary_part,
        }
    }
}
