use super::Instruction;

/// Remove all non-command bytes from the input, preserving order.
pub fn sanitize(input: &[u8]) -> Vec<u8> {
    let output: Vec<u8> = input
        .iter()
        .copied()
        .filter(|byte| Instruction::COMMANDS.contains(byte))
        .collect();

    tracing::debug!(
        input = input.len(),
        output = output.len(),
        "sanitized source"
    );

    output
}
