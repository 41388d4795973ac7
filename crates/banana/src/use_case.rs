use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Ready-made prompts the planner offers; the user's input is appended to the base prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum UseCase {
    CaseStudy,
    ImagePrompt,
    TweetAnalysis,
    TrendResearch,
    ContentIdeation,
    ViralHook,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseCaseInfo {
    pub id: String,
    pub title: &'static str,
    pub description: &'static str,
}

impl UseCase {
    pub fn id(&self) -> String {
        self.to_string()
    }

    pub fn title(&self) -> &'static str {
        match self {
            UseCase::CaseStudy => "Brand Case Study",
            UseCase::ImagePrompt => "AI Image Prompt",
            UseCase::TweetAnalysis => "Tweet Analysis",
            UseCase::TrendResearch => "Trend Research",
            UseCase::ContentIdeation => "Content Ideation",
            UseCase::ViralHook => "Viral Hook Generator",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UseCase::CaseStudy => "Generate detailed case studies with viral strategies",
            UseCase::ImagePrompt => "Create prompts for AI image generation (DALL-E, Midjourney)",
            UseCase::TweetAnalysis => "Analyze tweet virality and engagement potential",
            UseCase::TrendResearch => "Research trending topics and content strategies",
            UseCase::ContentIdeation => "Generate creative content ideas for your brand",
            UseCase::ViralHook => "Create attention-grabbing hooks for content",
        }
    }

    pub fn base_prompt(&self) -> &'static str {
        match self {
            UseCase::CaseStudy => "Create a comprehensive brand case study analyzing the following brand/product. Include: target audience analysis, unique value proposition, viral marketing strategies, content pillars, and growth tactics. Brand/Product: ",
            UseCase::ImagePrompt => "Generate a detailed, vivid image generation prompt for AI art tools (DALL-E, Midjourney, Stable Diffusion). Include style, composition, colors, mood, lighting, and specific visual details. Create an image of: ",
            UseCase::TweetAnalysis => "Analyze this tweet for virality potential. Provide: sentiment analysis, key themes, engagement factors, audience appeal, optimal posting time, and suggestions for improvement. Tweet: ",
            UseCase::TrendResearch => "Research current trends and create a content strategy around the following topic. Include: trending hashtags, content angles, audience insights, competitor analysis, and viral content ideas. Topic: ",
            UseCase::ContentIdeation => "Generate 10 creative content ideas for social media marketing. Include: content format, hook, key message, call-to-action, and expected engagement type. Create content ideas for: ",
            UseCase::ViralHook => "Generate 5 viral hooks/opening lines that will stop the scroll and capture attention. These hooks should be intriguing, relatable, and shareable. Create hooks for: ",
        }
    }

    /// The full prompt sent to the relay for `input`
    pub fn prompt(&self, input: &str) -> String {
        format!("{}{}", self.base_prompt(), input.trim())
    }

    pub fn info(&self) -> UseCaseInfo {
        UseCaseInfo {
            id: self.id(),
            title: self.title(),
            description: self.description(),
        }
    }

    pub fn catalog() -> Vec<UseCaseInfo> {
        UseCase::iter().map(|use_case| use_case.info()).collect()
    }
}
