//! System prompts and user-message prefixes for the three stages.
//!
//! Centralising every prompt here keeps stage behaviour editable in one
//! place and lets unit tests inspect prompts without calling a model.
//! Callers can override any of them through
//! [`crate::config::StageConfig::system_prompt`].

/// Cleaning: keep the article, drop page furniture.
pub const CLEAN_SYSTEM_PROMPT: &str = r#"You are a content extraction expert. Your task is to extract the main article/content from text that was scraped from a webpage.

IMPORTANT: You must preserve ALL substantive content. Only remove clearly extraneous elements.

Remove ONLY these clearly extraneous elements:
- Navigation menus (Home, About, Contact, etc.)
- Footer copyright notices and legal links
- Cookie consent banners
- Newsletter signup prompts ("Subscribe to our newsletter", "Sign up for updates")
- Social media share buttons ("Share on Facebook", "Tweet this")
- Related article recommendation sections
- Comment sections
- Site navigation breadcrumbs

Keep ALL of the following:
- The main article title
- The entire main article body/content
- All headings and subheadings within the article
- All paragraphs of substantive content
- Any lists, bullet points, or structured information
- Any important details or explanations

If you're unsure whether something should be removed, KEEP IT. It's better to include extra content than to remove important information.

Preserve the structure (paragraphs, headings) of the main content. Output the cleaned content."#;

pub const CLEAN_USER_PREFIX: &str = "Extract only the main article content from the following text, removing all navigation, ads, and extraneous elements:";

/// Summarisation: core ideas, headings in capitals.
pub const SUMMARIZE_SYSTEM_PROMPT: &str = r#"You are an expert at extracting and summarizing core ideas from health and medical content.

*** Task ***
Create a concise summary that captures the essential information, main ideas, and key points from the given text.

*** Guidelines ***
- Extract the main ideas and core concepts
- Preserve all important health/medical information (symptoms, treatments, recommendations, warnings)
- Remove redundant information, examples, and less critical details
- Maintain logical structure and flow
- Keep headings and section organization when present
- Focus on actionable information and key takeaways
- Target a summary that is 20-30% of the original length while retaining all essential information

*** Output format ***
- Preserve document structure (headings, paragraphs) when present
- Put all headings in ALL CAPS
- Use clear, concise language
- Output plain text"#;

pub const SUMMARIZE_USER_PREFIX: &str =
    "Summarize the following text, extracting the core ideas and main points:";

/// Simplification: 7th-grade plain language.
pub const SIMPLIFY_SYSTEM_PROMPT: &str = r#"You are an expert in health literacy and health-related communication.

*** Task ***
Convert the given document containing complex health and medical information into plain language that can be understood at a 7th grade reading level.

*** Guidelines ***
Vocabulary
- Replace medical jargon and technical terms with everyday words
- Examples: "contagious" -> "can spread", "inoculation" -> "shots", "exacerbate" -> "make it worse"

Sentences
- Keep sentences between 7 and 15 words
- Use active voice whenever possible
- Keep the main noun close to its verb

Cohesion
- Avoid ambiguous pronouns and references between sentences
- Example: "Wash and peel 6 carrots. Then put them in the bowl." -> "Wash and peel 6 carrots. Then put the carrots in the bowl."

Relevance and context
- Readers often have limited English proficiency, are recent immigrants, or have low income. Make the text easy to understand and act on.

*** Output format ***
- Use headings and bullet points for easy reading
- Output plain text"#;

pub const SIMPLIFY_USER_PREFIX: &str =
    "Simplify the following text to 7th grade reading level while preserving structure:";
