use scout_core::{CampaignBrief, RankingCandidate};

use crate::error::OracleError;

/// Candidates beyond this many are left out of the prompt.
pub const MAX_PROMPT_CANDIDATES: usize = 30;

/// Instruction sent with each feed screenshot.
pub const FEED_DESCRIPTION_PROMPT: &str = "The attached image is a screenshot of a social media influencer's feed. Describe the characteristics of their posts in one paragraph.";

/// Builds the ranking instruction for `candidates`, asking for the top `n`.
///
/// Brief fields are embedded verbatim. Only the first
/// [`MAX_PROMPT_CANDIDATES`] candidates are serialized.
///
/// # Errors
///
/// Returns [`OracleError::Deserialize`] if the candidate list cannot be
/// serialized to JSON.
pub fn build_ranking_prompt(
    brief: &CampaignBrief,
    candidates: &[RankingCandidate],
    n: usize,
) -> Result<String, OracleError> {
    let shown = &candidates[..candidates.len().min(MAX_PROMPT_CANDIDATES)];
    let candidates_json = serde_json::to_string(shown).map_err(|e| OracleError::Deserialize {
        context: "ranking prompt candidates".to_owned(),
        source: e,
    })?;

    Ok(format!(
        "Help me find suitable social media influencers for my company's marketing campaign. Here are the details:\n\
         - Company name: {company_name}\n\
         - Category: {category}\n\
         - Company description: {company_description}\n\
         - Campaign description: {campaign_description}\n\
         - Ideal influencer description: {ideal_influencer}\n\
         \n\
         Here is a list of potential candidates (assume adequate budget):\n\
         {candidates_json}\n\
         \n\
         Please respond with the usernames of the top {n} influencers in an array format with no additional text.",
        company_name = brief.company_name,
        category = brief.category,
        company_description = brief.company_description,
        campaign_description = brief.campaign_description,
        ideal_influencer = brief.ideal_influencer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use scout_core::{
        CandidateInfluencer, Category, EnrichedInfluencer, FollowerRange, PackageOffer, Platform,
    };

    fn brief() -> CampaignBrief {
        CampaignBrief {
            company_name: "Glow Labs".to_string(),
            category: Category::Beauty,
            company_description: "Clean skincare".to_string(),
            campaign_description: "Launch our new serum".to_string(),
            budget: Decimal::from(100),
            follower_range: FollowerRange {
                min: 10_000,
                max: 50_000,
            },
            platform: Platform::Instagram,
            ideal_influencer: "Honest reviewer".to_string(),
        }
    }

    fn candidate(i: usize) -> RankingCandidate {
        let influencer = CandidateInfluencer {
            username: format!("user{i}"),
            name: format!("User {i}"),
            category: Category::Beauty,
            follower_count: 10_000,
            title: String::new(),
            description: String::new(),
            rating_count: 0,
            average_rating: 0.0,
        };
        RankingCandidate::from(&EnrichedInfluencer::new(
            influencer,
            vec![PackageOffer {
                title: "Post".to_string(),
                price: Decimal::from(50),
            }],
        ))
    }

    #[test]
    fn prompt_embeds_brief_fields_verbatim() {
        let prompt = build_ranking_prompt(&brief(), &[candidate(0)], 10).expect("prompt");
        assert!(prompt.contains("- Company name: Glow Labs\n"));
        assert!(prompt.contains("- Category: Beauty\n"));
        assert!(prompt.contains("- Company description: Clean skincare\n"));
        assert!(prompt.contains("- Campaign description: Launch our new serum\n"));
        assert!(prompt.contains("- Ideal influencer description: Honest reviewer\n"));
        assert!(prompt.contains("(assume adequate budget)"));
        assert!(prompt.ends_with(
            "top 10 influencers in an array format with no additional text."
        ));
    }

    #[test]
    fn prompt_caps_candidate_list() {
        let candidates: Vec<RankingCandidate> = (0..40).map(candidate).collect();
        let prompt = build_ranking_prompt(&brief(), &candidates, 3).expect("prompt");
        assert!(prompt.contains("\"user29\""));
        assert!(!prompt.contains("\"user30\""));
    }
}
