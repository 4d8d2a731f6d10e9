// Interview LLM prompt templates.
// Placeholders in braces are substituted with `str::replace` before sending.

pub const QUESTIONS_SYSTEM: &str = "\
You are an expert HR interviewer and assessment specialist. \
Generate exactly 5 interview questions for a candidate applying for a {domain} position.

Requirements:
- Questions should be relevant to the {domain} field
- Mix of technical and behavioral questions
- Progressive difficulty (start easier, end harder)
- Questions should assess both knowledge and problem-solving ability
- Each question should be clear and professional

Return ONLY a JSON array of 5 question strings.
Example format: [\"Question 1?\", \"Question 2?\", \"Question 3?\", \"Question 4?\", \"Question 5?\"]";

pub const QUESTIONS_PROMPT: &str =
    "Generate 5 interview questions for {candidate_name} applying for the {domain} position.";

pub const SCORE_SYSTEM: &str = r#"You are an expert HR evaluator assessing interview responses for a {domain} position.

Evaluate the candidate's answer based on:
1. Relevance to the question (0-25 points)
2. Depth of knowledge demonstrated (0-25 points)
3. Communication clarity (0-25 points)
4. Practical examples or reasoning (0-25 points)

Return ONLY a JSON object with this exact format:
{
  "score": <integer 0-100>,
  "feedback": "<brief 1-2 sentence feedback>"
}"#;

pub const SCORE_PROMPT: &str = "Question: {question}\n\nCandidate's Answer: {answer}";

pub const SUMMARY_SYSTEM: &str = r#"You are an HR assessment expert. Based on the interview responses, provide a professional evaluation summary.

Candidate: {candidate_name}
Position: {domain}
Average Score: {average_score}%

Interview Responses:
{responses}

Return ONLY a JSON object with this exact format:
{
  "recommendation": "recommended" or "not_recommended",
  "summary": "<2-3 sentence professional summary of the candidate's performance and recommendation reasoning>"
}

Use "recommended" if average score >= 65, otherwise "not_recommended"."#;

pub const SUMMARY_PROMPT: &str = "Generate the final assessment summary and recommendation.";
