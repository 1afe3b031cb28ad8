use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use samrgeom::config::GeometryInput;
use samrgeom::error::{Error, Result};
use samrgeom::geometry::CartesianGridGeometry;
use samrgeom::index_space::IndexBox;
use samrgeom::level::PatchHierarchy;
use samrgeom::restart::RestartDatabase;




#[derive(Debug, Parser)]
#[clap(version = "0.1", author = "J. Zrake <jzrake@clemson.edu>")]
struct Opts {
    /// RON file with the geometry input; not needed when restarting
    #[clap(required_unless_present = "restart-from")]
    input: Option<String>,

    #[clap(short = 'd', long, default_value = "2")]
    dim: usize,

    #[clap(short = 'r', long, default_value = "2")]
    refinement_ratio: i64,

    #[clap(short = 'b', long, default_value = "2")]
    blocks_per_axis: i64,

    /// Restart file to resume the geometry from
    #[clap(long)]
    restart_from: Option<String>,

    /// Restart file to write the hierarchy to
    #[clap(short = 'o', long)]
    restart_to: Option<String>,
}




/**
 * Split a box into equal blocks along each axis. Remainder cells go to the
 * last block on each axis.
 */
fn split<const DIM: usize>(b: &IndexBox<DIM>, blocks: i64) -> Vec<IndexBox<DIM>> {
    IndexBox::new([0; DIM], [blocks - 1; DIM])
        .iter()
        .map(|block| {
            let mut lower = b.lower();
            let mut upper = b.lower();

            for d in 0..DIM {
                let size = b.num_cells(d) / blocks;
                lower[d] += block[d] * size;
                upper[d] = if block[d] == blocks - 1 { b.upper()[d] } else { lower[d] + size - 1 };
            }
            IndexBox::new(lower, upper)
        })
        .filter(|b| !b.is_empty())
        .collect()
}

fn run<const DIM: usize>(opts: &Opts, input: Option<&GeometryInput>) -> Result<()> {
    let restart = match &opts.restart_from {
        Some(path) => Some(RestartDatabase::read_file(path)?),
        None => None,
    };
    let geometry = CartesianGridGeometry::<DIM>::from_input("geometry", input, restart.as_ref())?;
    println!("{}", geometry);

    let mut hierarchy = PatchHierarchy::new("hierarchy", geometry);
    let level = hierarchy.make_new_level([opts.refinement_ratio; DIM])?;
    let domain = *level.geometry().domain_box();
    level.insert_patches(split(&domain, opts.blocks_per_axis))?;

    for patch in level.patches() {
        if let Some(pg) = patch.geometry() {
            println!("patch {:?}: x_lo = {:?} x_up = {:?}", patch.index_box(), pg.x_lo(), pg.x_up());

            for b in pg.boundary_boxes() {
                println!("    codim {} location {} {:?} {:?}", b.codimension(), b.location_index(), b.kind(), b.region());
            }
        }
    }

    if let Some(path) = &opts.restart_to {
        let mut db = RestartDatabase::new();
        hierarchy.put_to_restart(&mut db)?;
        db.write_file(path)?;
        info!("wrote {} records to {}", db.len(), path);
    }
    Ok(())
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init().unwrap();

    let opts = Opts::parse();
    let input = match &opts.input {
        Some(path) => Some(GeometryInput::from_ron_file("geometry", path)?),
        None => None,
    };

    match opts.dim {
        1 => run::<1>(&opts, input.as_ref()),
        2 => run::<2>(&opts, input.as_ref()),
        3 => run::<3>(&opts, input.as_ref()),
        d => Err(Error::InvalidConfiguration {
            object: "geometry".to_string(),
            reason: format!("unsupported dimension {}", d),
        }),
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use clap::Parser;
    use super::{split, Opts};
    use samrgeom::index_space::IndexBox;

    #[test]
    fn input_file_is_optional_when_restarting() {
        let opts = Opts::try_parse_from(["describe_geometry", "--restart-from", "state.cbor"]).unwrap();
        assert!(opts.input.is_none());
        assert!(Opts::try_parse_from(["describe_geometry"]).is_err());
        assert!(Opts::try_parse_from(["describe_geometry", "input.ron"]).is_ok());
    }

    #[test]
    fn split_covers_the_box() {
        let b = IndexBox::new([0, 0], [9, 7]);
        let blocks = split(&b, 3);
        assert_eq!(blocks.len(), 9);
        assert_eq!(blocks.iter().map(IndexBox::len).sum::<usize>(), b.len());
    }
}
