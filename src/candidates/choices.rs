// src/candidates/choices.rs
//! Questionnaire answers
//!
//! Every categorical answer exists in two vocabularies: the hyphenated token
//! the questionnaire posts (`greater-accra`) and the underscore token stored in
//! `candidate_responses` (`greater_accra`). Each category is a closed enum with
//! an exhaustive translation in both directions.

use serde::{Deserialize, Serialize};

/// Shared behaviour of the five questionnaire categories
pub trait Choice: Sized + Copy + 'static {
    /// Request field name, used in error messages
    const FIELD: &'static str;
    /// Storage column name
    const COLUMN: &'static str;
    const ALL: &'static [Self];

    /// Token posted by the questionnaire
    fn form_token(self) -> &'static str;

    /// Token stored in the database
    fn as_str(self) -> &'static str;

    fn from_form_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.iter().copied().find(|c| c.form_token() == token)
    }

    fn from_canonical(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.iter().copied().find(|c| c.as_str() == token)
    }

    fn canonical_tokens() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Location {
    GreaterAccra,
    OutsideGreaterAccra,
}

impl Choice for Location {
    const FIELD: &'static str = "location";
    const COLUMN: &'static str = "location";
    const ALL: &'static [Self] = &[Location::GreaterAccra, Location::OutsideGreaterAccra];

    fn form_token(self) -> &'static str {
        match self {
            Location::GreaterAccra => "greater-accra",
            Location::OutsideGreaterAccra => "outside-accra",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Location::GreaterAccra => "greater_accra",
            Location::OutsideGreaterAccra => "outside_greater_accra",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Framework {
    React,
    Nextjs,
    ReactAndNextjs,
    OtherFramework,
    NoFramework,
}

impl Choice for Framework {
    const FIELD: &'static str = "framework";
    const COLUMN: &'static str = "main_framework";
    const ALL: &'static [Self] = &[
        Framework::React,
        Framework::Nextjs,
        Framework::ReactAndNextjs,
        Framework::OtherFramework,
        Framework::NoFramework,
    ];

    fn form_token(self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Nextjs => "nextjs",
            Framework::ReactAndNextjs => "both",
            Framework::OtherFramework => "other",
            Framework::NoFramework => "vanilla",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Nextjs => "nextjs",
            Framework::ReactAndNextjs => "react_and_nextjs",
            Framework::OtherFramework => "other_framework",
            Framework::NoFramework => "no_framework",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum UiStructure {
    SmallReusableComponents,
    LargerSections,
    SingleComponent,
    WorkOnExisting,
}

impl Choice for UiStructure {
    const FIELD: &'static str = "uiStructure";
    const COLUMN: &'static str = "ui_structure";
    const ALL: &'static [Self] = &[
        UiStructure::SmallReusableComponents,
        UiStructure::LargerSections,
        UiStructure::SingleComponent,
        UiStructure::WorkOnExisting,
    ];

    fn form_token(self) -> &'static str {
        match self {
            UiStructure::SmallReusableComponents => "small-components",
            UiStructure::LargerSections => "large-sections",
            UiStructure::SingleComponent => "single-component",
            UiStructure::WorkOnExisting => "existing-codebase",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            UiStructure::SmallReusableComponents => "small_reusable_components",
            UiStructure::LargerSections => "larger_sections",
            UiStructure::SingleComponent => "single_component",
            UiStructure::WorkOnExisting => "work_on_existing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum GitUsage {
    OwnReposRegularCommits,
    CollaborativeBranchesPrs,
    BasicCommandsOccasional,
    LocalMachineOnly,
}

impl Choice for GitUsage {
    const FIELD: &'static str = "gitUsage";
    const COLUMN: &'static str = "git_usage";
    const ALL: &'static [Self] = &[
        GitUsage::OwnReposRegularCommits,
        GitUsage::CollaborativeBranchesPrs,
        GitUsage::BasicCommandsOccasional,
        GitUsage::LocalMachineOnly,
    ];

    fn form_token(self) -> &'static str {
        match self {
            GitUsage::OwnReposRegularCommits => "own-repos",
            GitUsage::CollaborativeBranchesPrs => "collaborative",
            GitUsage::BasicCommandsOccasional => "basic-usage",
            GitUsage::LocalMachineOnly => "local-only",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            GitUsage::OwnReposRegularCommits => "own_repos_regular_commits",
            GitUsage::CollaborativeBranchesPrs => "collaborative_branches_prs",
            GitUsage::BasicCommandsOccasional => "basic_commands_occasional",
            GitUsage::LocalMachineOnly => "local_machine_only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DesignTools {
    Figma,
    Sketch,
    OtherTools,
    PreferCodingOnly,
}

impl Choice for DesignTools {
    const FIELD: &'static str = "designTools";
    const COLUMN: &'static str = "design_tools";
    const ALL: &'static [Self] = &[
        DesignTools::Figma,
        DesignTools::Sketch,
        DesignTools::OtherTools,
        DesignTools::PreferCodingOnly,
    ];

    fn form_token(self) -> &'static str {
        match self {
            DesignTools::Figma => "figma",
            DesignTools::Sketch => "sketch",
            DesignTools::OtherTools => "other-tools",
            DesignTools::PreferCodingOnly => "prefer-coding",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DesignTools::Figma => "figma",
            DesignTools::Sketch => "sketch",
            DesignTools::OtherTools => "other_tools",
            DesignTools::PreferCodingOnly => "prefer_coding_only",
        }
    }
}

/// SQL `CHECK` clause restricting `C::COLUMN` to the canonical tokens.
pub fn check_constraint<C: Choice>() -> String {
    let quoted: Vec<String> = C::canonical_tokens()
        .iter()
        .map(|t| format!("'{}'", t))
        .collect();
    format!("CHECK ({} IN ({}))", C::COLUMN, quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_serde_matches_as_str<C>()
    where
        C: Choice + Serialize + std::fmt::Debug,
    {
        for choice in C::ALL {
            let json = serde_json::to_value(choice).unwrap();
            assert_eq!(json, serde_json::Value::from(choice.as_str()), "{:?}", choice);
        }
    }

    fn assert_translation_is_bijective<C>()
    where
        C: Choice + PartialEq + std::fmt::Debug,
    {
        for choice in C::ALL {
            assert_eq!(C::from_form_token(choice.form_token()), Some(*choice));
            assert_eq!(C::from_canonical(choice.as_str()), Some(*choice));
        }
    }

    #[test]
    fn test_serialized_form_is_canonical_token() {
        assert_serde_matches_as_str::<Location>();
        assert_serde_matches_as_str::<Framework>();
        assert_serde_matches_as_str::<UiStructure>();
        assert_serde_matches_as_str::<GitUsage>();
        assert_serde_matches_as_str::<DesignTools>();
    }

    #[test]
    fn test_every_choice_translates_both_ways() {
        assert_translation_is_bijective::<Location>();
        assert_translation_is_bijective::<Framework>();
        assert_translation_is_bijective::<UiStructure>();
        assert_translation_is_bijective::<GitUsage>();
        assert_translation_is_bijective::<DesignTools>();
    }

    #[test]
    fn test_form_token_mapping() {
        assert_eq!(Location::from_form_token("greater-accra"), Some(Location::GreaterAccra));
        assert_eq!(
            Location::from_form_token("outside-accra"),
            Some(Location::OutsideGreaterAccra)
        );
        assert_eq!(Framework::from_form_token("both"), Some(Framework::ReactAndNextjs));
        assert_eq!(Framework::from_form_token("vanilla"), Some(Framework::NoFramework));
        assert_eq!(
            UiStructure::from_form_token("existing-codebase"),
            Some(UiStructure::WorkOnExisting)
        );
        assert_eq!(
            GitUsage::from_form_token("collaborative").map(|g| g.as_str()),
            Some("collaborative_branches_prs")
        );
        assert_eq!(
            DesignTools::from_form_token("prefer-coding").map(|d| d.as_str()),
            Some("prefer_coding_only")
        );
    }

    #[test]
    fn test_unknown_and_cross_vocabulary_tokens_rejected() {
        assert_eq!(Location::from_form_token("kumasi"), None);
        // canonical tokens are not accepted as form tokens and vice versa
        assert_eq!(Location::from_form_token("greater_accra"), None);
        assert_eq!(Location::from_canonical("greater-accra"), None);
        assert_eq!(Framework::from_form_token(""), None);
        assert_eq!(DesignTools::from_form_token("Figma"), None);
    }

    #[test]
    fn test_check_constraint() {
        assert_eq!(
            check_constraint::<Location>(),
            "CHECK (location IN ('greater_accra', 'outside_greater_accra'))"
        );
    }
}
