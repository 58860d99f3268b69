use clap::Subcommand;

/// Assessment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AssessmentCommands {
    /// Create an assessment against a framework.
    Create {
        /// Framework code.
        #[arg(long)]
        framework: String,
        #[arg(long)]
        org: String,
        #[arg(long)]
        name: String,
    },
    /// Save a response for one clause, control, or requirement.
    Respond {
        id: String,
        /// `clause:<id>`, `control:<id>`, or `requirement:<id>`.
        locator: String,
        /// NOT_ASSESSED, NON_COMPLIANT, PARTIALLY_COMPLIANT, or COMPLIANT.
        #[arg(long)]
        status: String,
        /// Maturity level, 1 to 5.
        #[arg(long)]
        maturity: Option<i64>,
        #[arg(long)]
        gaps: Option<String>,
        #[arg(long)]
        recommendations: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Score and complete an assessment.
    Complete { id: String },
    /// Archive an assessment.
    Archive { id: String },
    /// Projection with assessed counts and status breakdown.
    Progress { id: String },
    /// Average maturity per clause.
    Maturity { id: String },
    /// An assessment with its responses.
    Show { id: String },
    /// List an organization's assessments.
    List {
        #[arg(long)]
        org: String,
    },
}
