//! Instruction prompt sent alongside each drawing.

use canvas_core::VariableContext;

const INSTRUCTIONS: &str = "\
You are given an image of handwritten mathematics drawn on a dark canvas. \
Read every expression or equation in it and evaluate it, following the usual \
order of operations (parentheses, exponents, multiplication and division left \
to right, addition and subtraction left to right).

Reply with a JSON array and nothing else. Each element must have exactly \
these keys:
  \"expr\": the expression as you read it, as a string
  \"result\": its value, as a number when numeric and otherwise a string
  \"assign\": true only when the drawing assigns a value to a variable \
(for example \"x = 5\"), in which case \"expr\" is the variable name and \
\"result\" the assigned value; false otherwise

Examples:
  2 + 2 gives [{\"expr\": \"2+2\", \"result\": 4, \"assign\": false}]
  x = 5 gives [{\"expr\": \"x\", \"result\": 5, \"assign\": true}]

Do not use Markdown. Escape backslashes and quotes inside strings.";

/// Build the prompt for one drawing, embedding previously assigned variables.
pub fn build_prompt(variables: &VariableContext) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    if !variables.is_empty() {
        prompt.push_str(
            "\n\nThese variables were assigned earlier. Substitute their values \
             wherever they appear in the drawing:\n",
        );
        prompt.push_str(&variables.to_json());
    }
    prompt
}
