use anyhow::Result;
use tracing::info;

use ntc_dichotomy::sim::{LinearShifter, SimNetwork, SimReport, ThresholdValidator};
use ntc_dichotomy::{
    BiDirectionalSteps, BiDirectionalStepsWithReference, DichotomyEngine, Index, IndexStrategy,
    RangeDivision, SearchResult, Steps,
};

use crate::cli::{SearchArgs, StrategyKind};
use crate::config::SearchParams;

pub fn handle(args: &SearchArgs) -> Result<()> {
    let params = SearchParams::resolve(args)?;
    info!(
        min = params.min,
        max = params.max,
        precision = params.precision,
        strategy = ?params.strategy,
        "starting dichotomy search"
    );
    let result = run_simulated_search(&params)?;

    match result.best_secure_value() {
        Some(value) => eprintln!(
            "search finished: secure up to {value} MW ({})",
            result.limiting_cause().as_str()
        ),
        None => eprintln!(
            "search finished: no secure exchange found ({})",
            result.limiting_cause().as_str()
        ),
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Builds the simulated network and oracle from the resolved parameters and
/// runs the search with the selected strategy.
pub fn run_simulated_search(params: &SearchParams) -> Result<SearchResult<SimReport>> {
    let shifter = LinearShifter::new(params.glsk_min, params.glsk_max);
    let validator = ThresholdValidator::new(params.secure_limit);
    let mut model = SimNetwork::new(params.min);
    match params.strategy {
        StrategyKind::RangeDivision => run_engine(
            params,
            RangeDivision::new(true),
            shifter,
            validator,
            &mut model,
        ),
        StrategyKind::Steps => run_engine(
            params,
            Steps::new(true, params.step_size)?,
            shifter,
            validator,
            &mut model,
        ),
        StrategyKind::Bidirectional => run_engine(
            params,
            BiDirectionalSteps::new(params.start, params.step_size)?,
            shifter,
            validator,
            &mut model,
        ),
        StrategyKind::Reference => run_engine(
            params,
            BiDirectionalStepsWithReference::new(
                params.start,
                params.step_size,
                params.reference,
            )?,
            shifter,
            validator,
            &mut model,
        ),
    }
}

fn run_engine<S>(
    params: &SearchParams,
    strategy: S,
    shifter: LinearShifter,
    validator: ThresholdValidator,
    model: &mut SimNetwork,
) -> Result<SearchResult<SimReport>>
where
    S: IndexStrategy<SimReport>,
{
    let index = Index::new(params.min, params.max, params.precision)?;
    let engine = DichotomyEngine::with_max_iterations(
        index,
        strategy,
        shifter,
        validator,
        params.max_iterations,
    )?;
    Ok(engine.run(model)?)
}
