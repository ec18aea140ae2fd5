/// HDF5 access to multi-group ifgram stacks and mask files.
///
/// Layout: a top-level group named after the file type, holding one group
/// per pair. Each pair group carries `DATE12`, `P_BASELINE_TOP_HDR`,
/// `P_BASELINE_BOTTOM_HDR` and `drop_ifgram` attributes and a 2-D dataset
/// of the same name.
use std::path::Path;

use hdf5::types::{VarLenAscii, VarLenUnicode};
use hdf5::{Dataset, File, Group, Location};
use ndarray::Array2;

use super::coherence::{CoherenceList, nan_mean};
use super::date::{date12_from_name, normalize_date12};
use super::errors::NetworkError;
use super::stack::{IfgramStack, MULTI_GROUP_TYPES, StackPair};

impl From<hdf5::Error> for NetworkError {
    fn from(err: hdf5::Error) -> Self {
        Self::Hdf5(err.to_string())
    }
}

/// Read the pair metadata of a stack.
///
/// # Errors
///
/// Returns `NetworkError::UnsupportedFileType` for non-stack files and
/// `NetworkError::Hdf5` for library failures.
pub fn read_stack(path: &Path) -> Result<IfgramStack, NetworkError> {
    let file = open(path)?;
    let file_type = file_type(&file)?;
    IfgramStack::check_file_type(&file_type)?;
    log::info!(
        "reading date and perpendicular baseline from {file_type} file: {}",
        path.display()
    );

    let root = file.group(&file_type)?;
    let mut names = root.member_names()?;
    names.sort();

    let mut pairs = Vec::with_capacity(names.len());
    for name in names {
        let group = root.group(&name)?;
        let attrs: &Location = &group;
        let date12 = match read_string_attr(attrs, "DATE12") {
            Some(d) => normalize_date12(&d)?,
            None => date12_from_name(&name)?,
        };
        pairs.push(StackPair {
            date12,
            bperp_top: read_float_attr(attrs, "P_BASELINE_TOP_HDR").unwrap_or(0.0),
            bperp_bottom: read_float_attr(attrs, "P_BASELINE_BOTTOM_HDR").unwrap_or(0.0),
            dropped: read_string_attr(attrs, "drop_ifgram").is_some_and(|v| v == "yes"),
            name,
        });
    }
    Ok(IfgramStack { file_type, pairs })
}

/// Spatially averaged coherence of every pair in a stack.
///
/// # Errors
///
/// Returns `NetworkError::Hdf5` if a dataset cannot be read.
pub fn spatial_average(path: &Path, mask_file: Option<&Path>) -> Result<CoherenceList, NetworkError> {
    let mask = mask_file.map(read_mask).transpose()?;
    let stack = read_stack(path)?;
    let file = open(path)?;
    let root = file.group(&stack.file_type)?;

    let mut list = CoherenceList::default();
    for pair in &stack.pairs {
        let data = pair_dataset(&root.group(&pair.name)?, &pair.name)?.read_2d::<f32>()?;
        list.values.push(nan_mean(data.view(), mask.as_ref().map(Array2::view)));
        list.date12.push(pair.date12.clone());
    }
    Ok(list)
}

/// Read a mask file; non-zero pixels are valid.
///
/// # Errors
///
/// Returns `NetworkError::Hdf5` if no mask dataset can be read.
pub fn read_mask(path: &Path) -> Result<Array2<bool>, NetworkError> {
    let file = open(path)?;
    let dataset = match file.group("mask") {
        Ok(group) => pair_dataset(&group, "mask")?,
        Err(_) => file.dataset("mask")?,
    };
    Ok(dataset.read_2d::<f32>()?.mapv(|v| v != 0.0))
}

fn open(path: &Path) -> Result<File, NetworkError> {
    File::open(path).map_err(|e| NetworkError::Hdf5(format!("{}: {e}", path.display())))
}

/// `FILE_TYPE` root attribute, else the first top-level group that is a
/// known stack type, else the first top-level member.
fn file_type(file: &File) -> Result<String, NetworkError> {
    if let Some(k) = read_string_attr(file, "FILE_TYPE") {
        return Ok(k);
    }
    let names = file.member_names()?;
    Ok(names
        .iter()
        .find(|n| MULTI_GROUP_TYPES.contains(&n.as_str()))
        .or_else(|| names.first())
        .cloned()
        .unwrap_or_default())
}

/// The dataset of a pair group: same name as the group, else the first member.
fn pair_dataset(group: &Group, name: &str) -> Result<Dataset, NetworkError> {
    if let Ok(ds) = group.dataset(name) {
        return Ok(ds);
    }
    let first = group
        .member_names()?
        .into_iter()
        .next()
        .ok_or_else(|| NetworkError::Hdf5(format!("group '{name}' holds no dataset")))?;
    Ok(group.dataset(&first)?)
}

fn read_string_attr(loc: &Location, name: &str) -> Option<String> {
    let attr = loc.attr(name).ok()?;
    if let Ok(s) = attr.read_scalar::<VarLenUnicode>() {
        return Some(s.as_str().trim().to_owned());
    }
    if let Ok(s) = attr.read_scalar::<VarLenAscii>() {
        return Some(s.as_str().trim().to_owned());
    }
    attr.read_scalar::<f64>().ok().map(|v| v.to_string())
}

fn read_float_attr(loc: &Location, name: &str) -> Option<f64> {
    if let Ok(v) = loc.attr(name).ok()?.read_scalar::<f64>() {
        return Some(v);
    }
    read_string_attr(loc, name)?.parse().ok()
}
