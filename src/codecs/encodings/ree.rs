use crate::codecs::{Codec, CodecError, CodecFunction, CodecResult, NativeType, WrittenBuffer};

/// Type of the run-end indices.
pub type RunEnd = u32;

/// Worst-case number of runs for a column of `len` elements; both encode outputs must hold at
/// least this many elements.
pub const fn max_runs(len: usize) -> usize {
    len
}

/// Run-end encodes `input`.
///
/// Each maximal run of identical values (bit-identical for floats) emits its value into `values`
/// and its exclusive end index into `run_ends`. Both outputs must be sized for
/// [`max_runs`]`(input.len())`, because the number of runs is only known after the scan.
///
/// Returns descriptors for `values` and `run_ends`; `num_elements` of both is the run count.
pub fn encode<T: NativeType>(
    input: &[T],
    values: &mut [T],
    run_ends: &mut [RunEnd],
) -> CodecResult<(WrittenBuffer, WrittenBuffer)> {
    if RunEnd::try_from(input.len()).is_err() {
        return Err(CodecError::InvalidInput(Codec::Ree, CodecFunction::Encode));
    }
    let worst_case = max_runs(input.len());
    if values.len() < worst_case || run_ends.len() < worst_case {
        return Err(CodecError::OutputBufferTooSmall(
            Codec::Ree,
            CodecFunction::Encode,
        ));
    }

    let mut runs = 0;
    if let Some((&first, rest)) = input.split_first() {
        let mut current = first;
        for (i, &v) in rest.iter().enumerate() {
            if !v.is_identical(current) {
                values[runs] = current;
                run_ends[runs] = (i + 1) as RunEnd;
                runs += 1;
                current = v;
            }
        }
        values[runs] = current;
        run_ends[runs] = input.len() as RunEnd;
        runs += 1;
    }

    let input_bytes = size_of_val(input);
    tracing::trace!(
        ty = T::NAME,
        len = input.len(),
        runs,
        "run-end encoded column"
    );
    Ok((
        WrittenBuffer::of_elements::<T>(runs, input_bytes),
        WrittenBuffer::of_elements::<RunEnd>(runs, input_bytes),
    ))
}

/// Expands runs back into `output`.
///
/// Writes `run_ends.last()` elements. Run ends must come from [`encode`]; the only validation is
/// what keeps the expansion in bounds: matching lengths, non-decreasing run ends and an output
/// large enough for the last run end.
pub fn decode<T: NativeType>(
    values: &[T],
    run_ends: &[RunEnd],
    output: &mut [T],
) -> CodecResult<WrittenBuffer> {
    if values.len() != run_ends.len() {
        return Err(CodecError::InvalidInput(Codec::Ree, CodecFunction::Decode));
    }
    let total = run_ends.last().map_or(0, |&end| end as usize);
    if output.len() < total {
        return Err(CodecError::OutputBufferTooSmall(
            Codec::Ree,
            CodecFunction::Decode,
        ));
    }

    let mut start = 0;
    for (&value, &end) in values.iter().zip(run_ends) {
        let end = end as usize;
        let run = output
            .get_mut(start..end)
            .ok_or(CodecError::InvalidInput(Codec::Ree, CodecFunction::Decode))?;
        run.fill(value);
        start = end;
    }

    Ok(WrittenBuffer::of_elements::<T>(
        total,
        size_of_val(values) + size_of_val(run_ends),
    ))
}
