use crate::cli::QueryArgs;
use crate::error::{ErrorKind, Result};
use crate::logging;
use exn::ResultExt;
use homecache_manifest::CustomQuery;

pub fn execute(args: QueryArgs) -> Result<()> {
    logging::init(None)?;
    let query = CustomQuery::new(&args.search, &args.replace, &args.blocklist).or_raise(|| ErrorKind::Query)?;
    let written = query.filter_file(&args.input, &args.output).or_raise(|| ErrorKind::Query)?;
    println!("{written} lines written to {}", args.output.display());
    Ok(())
}
