use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use coresel_core::{CoreData, DistanceMatrixData, GenotypeData, Genotypes, NamedDataset};
use coresel_io::{Delimiter, SymmetricMatrixFormat};
use coresel_objectives::{
    best_index, evaluate_all, AccessionToNearestEntryDistance, AverageDistance, Coverage,
    EffectiveAlleles, EntryToNearestEntryDistance, Heterozygosity, Objective,
    ProportionNonInformativeAlleles, Shannon,
};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// coresel: diversity measures for core collection selection
#[derive(Parser)]
#[command(
    name = "coresel",
    version,
    about = "coresel: load germplasm distance and genotype data and score candidate core collections"
)]
struct Cli {
    /// Log progress (overridden by RUST_LOG)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load datasets and print their dimensions
    Summary {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Evaluate objectives for one or more subsets
    #[command(after_help = "EXAMPLES:
    # Average distance of three accessions, selected by id
    coresel evaluate --distances dist.csv --objective average-distance --subset Alice,Bob,Carol

    # Several objectives and subsets (indices are zero-based)
    coresel evaluate --genotypes geno.txt --objective shannon,coverage \\
        --subset 0,1,2 --subset 3,4,5")]
    Evaluate {
        #[command(flatten)]
        data: DataArgs,

        /// Objectives to evaluate (comma-separated)
        #[arg(long, value_delimiter = ',', required = true, help_heading = "Analysis")]
        objective: Vec<ObjectiveKind>,

        /// Comma-separated item ids or zero-based indices; repeat for several subsets
        #[arg(long, required = true, help_heading = "Analysis")]
        subset: Vec<String>,

        /// Number of threads to use for batch evaluation (default: all cores)
        #[arg(long, help_heading = "Analysis")]
        threads: Option<usize>,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Precomputed distance matrix (.csv, .txt or .tsv, optionally gzipped)
    #[arg(long, help_heading = "Input")]
    distances: Option<PathBuf>,

    /// Layout of the distance matrix
    #[arg(long, value_enum, default_value_t = MatrixFormat::Full, help_heading = "Input")]
    distance_format: MatrixFormat,

    /// Genotype data (.csv, .txt or .tsv, optionally gzipped)
    #[arg(long, help_heading = "Input")]
    genotypes: Option<PathBuf>,

    /// Kind of genotype data
    #[arg(long, value_enum, default_value_t = GenotypeFormat::Biallelic, help_heading = "Input")]
    genotype_format: GenotypeFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum MatrixFormat {
    Full,
    Lower,
    LowerDiag,
}

impl From<MatrixFormat> for SymmetricMatrixFormat {
    fn from(format: MatrixFormat) -> Self {
        match format {
            MatrixFormat::Full => SymmetricMatrixFormat::Full,
            MatrixFormat::Lower => SymmetricMatrixFormat::Lower,
            MatrixFormat::LowerDiag => SymmetricMatrixFormat::LowerDiag,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GenotypeFormat {
    /// Allele scores 0, 1, 2 per marker
    Biallelic,
    /// Allele frequencies per marker
    Multiallelic,
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectiveKind {
    AverageDistance,
    EntryToNearestEntry,
    AccessionToNearestEntry,
    Shannon,
    Coverage,
    NonInformativeAlleles,
    Heterozygosity,
    EffectiveAlleles,
}

impl ObjectiveKind {
    fn build(self) -> Box<dyn Objective> {
        match self {
            Self::AverageDistance => Box::new(AverageDistance),
            Self::EntryToNearestEntry => Box::new(EntryToNearestEntryDistance),
            Self::AccessionToNearestEntry => Box::new(AccessionToNearestEntryDistance),
            Self::Shannon => Box::new(Shannon),
            Self::Coverage => Box::new(Coverage),
            Self::NonInformativeAlleles => Box::new(ProportionNonInformativeAlleles),
            Self::Heterozygosity => Box::new(Heterozygosity),
            Self::EffectiveAlleles => Box::new(EffectiveAlleles),
        }
    }
}

fn delimiter_for(path: &Path) -> Result<Delimiter> {
    Delimiter::from_path(path).with_context(|| {
        format!(
            "cannot infer delimiter of {}: expected .csv, .txt or .tsv (optionally .gz)",
            path.display()
        )
    })
}

fn load_distances(path: &Path, format: MatrixFormat) -> Result<DistanceMatrixData> {
    let delimiter = delimiter_for(path)?;
    coresel_io::load_distance_matrix(path, delimiter, format.into())
        .with_context(|| format!("failed to load distance matrix {}", path.display()))
}

fn load_genotypes(path: &Path, format: GenotypeFormat) -> Result<Genotypes> {
    let delimiter = delimiter_for(path)?;
    let genotypes = match format {
        GenotypeFormat::Biallelic => coresel_io::load_biallelic(path, delimiter).map(Genotypes::from),
        GenotypeFormat::Multiallelic => {
            coresel_io::load_multiallelic(path, delimiter).map(Genotypes::from)
        }
    };
    genotypes.with_context(|| format!("failed to load genotypes {}", path.display()))
}

fn load_data(args: &DataArgs) -> Result<CoreData> {
    if args.distances.is_none() && args.genotypes.is_none() {
        bail!("provide --distances, --genotypes or both");
    }
    let distances = args
        .distances
        .as_deref()
        .map(|p| load_distances(p, args.distance_format))
        .transpose()?;
    let genotypes = args
        .genotypes
        .as_deref()
        .map(|p| load_genotypes(p, args.genotype_format))
        .transpose()?;
    Ok(CoreData::new(distances, genotypes)?)
}

/// Resolve a comma-separated subset. Item ids take precedence over indices.
fn parse_subset(list: &str, data: &CoreData) -> Result<Vec<usize>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|token| -> Result<usize> {
            if let Some(i) = data.named().find_by_id(token) {
                return Ok(i);
            }
            match token.parse::<usize>() {
                Ok(i) if i < data.size() => Ok(i),
                Ok(i) => bail!("index {} is out of range for {} items", i, data.size()),
                Err(_) => bail!("unknown item id '{}'", token),
            }
        })
        .collect()
}

fn print_summary(data: &CoreData) {
    println!("items\t{}", data.size());
    if let Some(d) = data.distances() {
        println!("distances\t{}", d.dataset_name());
    }
    if let Some(g) = data.genotypes() {
        let kind = match g {
            Genotypes::Biallelic(_) => "biallelic",
            Genotypes::MultiAllelic(_) => "multiallelic",
        };
        println!("genotypes\t{} ({})", g.dataset_name(), kind);
        println!("markers\t{}", g.number_of_markers());
        println!("alleles\t{}", g.total_number_of_alleles());
    }
    let identified = data
        .named()
        .headers()
        .iter()
        .filter(|header| header.is_identified())
        .count();
    println!("identified items\t{}", identified);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Summary { data } => {
            let data = load_data(&data)?;
            print_summary(&data);
        }
        Commands::Evaluate {
            data,
            objective,
            subset,
            threads,
        } => {
            if let Some(n) = threads {
                let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
            }
            let data = load_data(&data)?;
            let subsets: Vec<Vec<usize>> = subset
                .iter()
                .map(|s| parse_subset(s, &data).with_context(|| format!("invalid subset '{}'", s)))
                .collect::<Result<_>>()?;

            println!("objective\tsubset\tvalue\tdirection\tbest");
            for kind in objective {
                let objective = kind.build();
                let start = Instant::now();
                let results = evaluate_all(objective.as_ref(), &data, &subsets)
                    .with_context(|| format!("failed to evaluate {}", objective.name()))?;
                info!(
                    "{} evaluated on {} subsets in {:.2?}",
                    objective.name(),
                    subsets.len(),
                    start.elapsed()
                );
                let best = best_index(&results);
                for (i, result) in results.iter().enumerate() {
                    let direction = if result.minimizing { "minimize" } else { "maximize" };
                    let is_best = if best == Some(i) { "yes" } else { "no" };
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        objective.name(),
                        i,
                        result.value,
                        direction,
                        is_best
                    );
                }
            }
        }
    }

    Ok(())
}
