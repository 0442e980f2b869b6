//! Join entry points

use fuzzyjoin_core::{Dataset, JoinMode, JoinSpec, Result, Table};
use tracing::{debug, info};

use crate::merge::{assemble, row_pairs, JoinOutput, RightIndex, RowMatches};
use crate::projection::KeyProjector;
use crate::scheduler::{partition, ChunkScheduler};

/// Fuzzy-join two tables
///
/// All column pairs are classified and prepared before any matching work,
/// so configuration and type errors surface without partial results. The
/// left table is then matched chunk by chunk on a worker pool; the output
/// is identical for every chunk and worker count.
pub fn fuzzy_join(left: &Table, right: &Table, spec: &JoinSpec) -> Result<JoinOutput> {
    spec.validate()?;

    info!(
        left_rows = left.num_rows(),
        right_rows = right.num_rows(),
        columns = spec.columns.len(),
        mode = %spec.mode,
        "starting fuzzy join"
    );

    let projector = KeyProjector::new(left, right, spec)?;

    let matches: Vec<RowMatches> = if spec.mode == JoinMode::Cross {
        Vec::new()
    } else {
        let index = RightIndex::build(&projector, right.num_rows());
        debug!(distinct_keys = index.len(), "indexed right keys");

        let scheduler = ChunkScheduler::new(spec.workers)?;
        let chunks = partition(left.num_rows(), spec.chunks);
        let per_chunk = scheduler.run(&chunks, |chunk, rows| {
            let len = rows.len();
            let keys = projector.left_keys(rows)?;
            let matched = index.probe(&keys, len);
            debug!(chunk, rows = len, "matched chunk");
            Ok(matched)
        })?;
        per_chunk.into_iter().flatten().collect()
    };

    let pairs = row_pairs(spec.mode, left.num_rows(), right.num_rows(), &matches);
    let output = assemble(left, right, projector.dropped_columns(), &pairs)?;

    info!(
        rows = output.table.num_rows(),
        columns = output.table.num_columns(),
        "fuzzy join complete"
    );
    Ok(output)
}

/// Output of [`join_datasets`]
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetJoin {
    /// The left dataset with its main resource replaced by the joined table
    pub dataset: Dataset,
    pub resource_id: String,
    pub vector_columns: Vec<String>,
}

/// Join the tabular resources of two datasets
///
/// Resources are selected with [`Dataset::tabular_resource`]. The joined
/// table replaces the selected left resource; other left resources are kept.
pub fn join_datasets(
    left: &Dataset,
    left_resource: Option<&str>,
    right: &Dataset,
    right_resource: Option<&str>,
    spec: &JoinSpec,
) -> Result<DatasetJoin> {
    let (left_id, left_table) = left.tabular_resource(left_resource)?;
    let (right_id, right_table) = right.tabular_resource(right_resource)?;
    debug!(left = left_id, right = right_id, "selected tabular resources");

    let output = fuzzy_join(left_table, right_table, spec)?;
    let resource_id = left_id.to_string();
    Ok(DatasetJoin {
        dataset: left.clone().with_resource(resource_id.clone(), output.table),
        resource_id,
        vector_columns: output.vector_columns,
    })
}
