use serde::Serialize;

use crate::external::{ExternalScoringError, ScorerFailurePolicy, SemanticScorer};
use crate::records::{BankRecord, CustomerIndex};
use crate::scoring::{calculate_score, LocalSimilarity, ScoreResult, ScoringConfig};

/// Outcome for one bank record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub link_id: String,
    pub company_id: String,
    pub customer_found: bool,
    #[serde(flatten)]
    pub score: ScoreResult,
    /// Set when the external call failed and the record was scored without it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorer_error: Option<String>,
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        self.score.is_match
    }
}

/// Match/mismatch counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total: usize,
    pub matches: usize,
    pub mismatches: usize,
}

impl Tally {
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let matches = verdicts
            .iter()
            .fold(0, |count, v| if v.is_match() { count + 1 } else { count });
        Self {
            total: verdicts.len(),
            matches,
            mismatches: verdicts.len() - matches,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub verdicts: Vec<Verdict>,
    pub tally: Tally,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub scoring: ScoringConfig,
    pub on_scorer_failure: ScorerFailurePolicy,
}

/// Score and classify one bank record.
pub async fn reconcile_record<S>(
    bank: &BankRecord,
    customers: &CustomerIndex,
    scorer: &S,
    options: &ReconcileOptions,
) -> Result<Verdict, ExternalScoringError>
where
    S: SemanticScorer + ?Sized,
{
    let customer = customers.get(&bank.company_id);
    if customer.is_none() {
        tracing::debug!(
            link_id = %bank.link_id,
            company_id = %bank.company_id,
            "no customer for companyId"
        );
    }

    let local = LocalSimilarity::compute(bank, customer);

    let (external_score, scorer_error) = match scorer.score(bank, customer).await {
        Ok(score) => (score, None),
        Err(e) => match options.on_scorer_failure {
            ScorerFailurePolicy::Abort => return Err(e),
            ScorerFailurePolicy::Skip => {
                tracing::warn!(
                    link_id = %bank.link_id,
                    error = %e,
                    "external scoring failed, using 0"
                );
                (0.0, Some(e.to_string()))
            }
        },
    };

    let score = calculate_score(local, external_score, &options.scoring);

    tracing::debug!(
        link_id = %bank.link_id,
        name = local.name,
        email = local.email,
        phone = local.phone,
        external = score.external_score,
        final_score = score.final_score,
        "scored record"
    );

    Ok(Verdict {
        link_id: bank.link_id.clone(),
        company_id: bank.company_id.clone(),
        customer_found: customer.is_some(),
        score,
        scorer_error,
    })
}

/// Reconcile every bank record in input order, one external call at a time.
///
/// `on_verdict` sees each verdict as soon as it is produced. Under
/// [`ScorerFailurePolicy::Abort`] the first scorer failure ends the run.
pub async fn reconcile<S, F>(
    banks: &[BankRecord],
    customers: &CustomerIndex,
    scorer: &S,
    options: &ReconcileOptions,
    mut on_verdict: F,
) -> Result<Reconciliation, ExternalScoringError>
where
    S: SemanticScorer + ?Sized,
    F: FnMut(&Verdict),
{
    let mut verdicts = Vec::with_capacity(banks.len());

    for bank in banks {
        let verdict = reconcile_record(bank, customers, scorer, options).await?;
        on_verdict(&verdict);
        verdicts.push(verdict);
    }

    let tally = Tally::from_verdicts(&verdicts);
    Ok(Reconciliation { verdicts, tally })
}
